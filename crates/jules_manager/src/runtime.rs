use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::{Action, ChatView, CodebaseView, DashboardView, View, ViewEvent};
use crate::dispatcher::ActionDispatcher;
use crate::error::{require_text, ActionError};
use crate::feed::ActivityFeed;
use crate::repository::{new_session_request, SessionRepository};
use crate::service::JulesService;

/// Shared home of one open view.
///
/// The screen owns the only strong reference. Background actions hold a
/// [`Weak`] and queue their results here; once the screen drops its handle
/// those results are discarded.
pub struct ViewHandle<V> {
    view: Mutex<V>,
    pending_events: Mutex<VecDeque<ViewEvent>>,
    changed: Notify,
}

impl<V: View> ViewHandle<V> {
    pub fn new(view: V) -> Arc<Self> {
        Arc::new(Self {
            view: Mutex::new(view),
            pending_events: Mutex::new(VecDeque::new()),
            changed: Notify::new(),
        })
    }

    /// Queues one action's results as a contiguous run, so results of
    /// actions finishing together never interleave.
    pub fn enqueue_all(&self, events: impl IntoIterator<Item = ViewEvent>) {
        lock_unpoisoned(&self.pending_events).extend(events);
        self.changed.notify_one();
    }

    /// Applies queued events in arrival order. Returns how many were applied.
    pub fn drain_pending_events(&self) -> usize {
        let mut drained = 0usize;

        loop {
            let event = lock_unpoisoned(&self.pending_events).pop_front();
            match event {
                Some(event) => {
                    lock_unpoisoned(&self.view).apply(event);
                    drained += 1;
                }
                None => break,
            }
        }

        drained
    }

    pub fn pending_len(&self) -> usize {
        lock_unpoisoned(&self.pending_events).len()
    }

    pub fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut lock_unpoisoned(&self.view))
    }

    /// Resolves once an event has been queued since the last wait.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }
}

/// Runs each user action as its own tokio task.
///
/// Actions are never serialized against each other: two refreshes in flight
/// both land, and whichever finishes last is what the view shows. Must be
/// used from within a tokio runtime.
#[derive(Clone)]
pub struct ViewController {
    repository: SessionRepository,
    feed: ActivityFeed,
    dispatcher: ActionDispatcher,
    discarded: Arc<AtomicUsize>,
}

impl ViewController {
    pub fn new(service: Arc<dyn JulesService>) -> Self {
        Self {
            repository: SessionRepository::new(Arc::clone(&service)),
            feed: ActivityFeed::new(Arc::clone(&service)),
            dispatcher: ActionDispatcher::new(service),
            discarded: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Results dropped because their view was gone when they arrived.
    pub fn discarded_count(&self) -> usize {
        self.discarded.load(Ordering::SeqCst)
    }

    fn spawn_action<V, Fut>(
        &self,
        handle: &Arc<ViewHandle<V>>,
        action: Action,
        work: Fut,
    ) -> JoinHandle<()>
    where
        V: View,
        Fut: Future<Output = Result<Vec<ViewEvent>, ActionError>> + Send + 'static,
    {
        handle.with_view(|view| view.begin_action(action));
        let target = Arc::downgrade(handle);
        let discarded = Arc::clone(&self.discarded);

        tokio::spawn(async move {
            let events = match work.await {
                Ok(events) => events,
                Err(error) => {
                    warn!(action = action.label(), %error, "action failed");
                    vec![ViewEvent::Failed {
                        action,
                        message: error.user_message(),
                    }]
                }
            };
            deliver(&target, events, &discarded, action);
        })
    }

    /// Reloads both dashboard tabs. All or nothing: either both lists are
    /// replaced or neither is.
    pub fn refresh_dashboard(&self, handle: &Arc<ViewHandle<DashboardView>>) -> JoinHandle<()> {
        let repository = self.repository.clone();
        self.spawn_action(handle, Action::Refresh, async move {
            let sessions = repository.list_sessions().await?;
            let sources = repository.list_sources().await?;
            Ok::<_, ActionError>(vec![
                ViewEvent::SessionsLoaded(sessions),
                ViewEvent::SourcesLoaded(sources),
            ])
        })
    }

    pub fn refresh_codebase(&self, handle: &Arc<ViewHandle<CodebaseView>>) -> JoinHandle<()> {
        let repository = self.repository.clone();
        let source = handle.with_view(|view| view.source_name().to_string());
        self.spawn_action(handle, Action::Refresh, async move {
            let sessions = repository.list_sessions_for_source(&source).await?;
            Ok::<_, ActionError>(vec![ViewEvent::SessionsLoaded(sessions)])
        })
    }

    /// Creates a session against the view's source, then reloads the list.
    /// A blank prompt is rejected here and nothing is spawned.
    pub fn create_session(
        &self,
        handle: &Arc<ViewHandle<CodebaseView>>,
        prompt: &str,
        branch: Option<&str>,
        title: Option<&str>,
    ) -> Result<JoinHandle<()>, ActionError> {
        let source = handle.with_view(|view| view.source_name().to_string());
        new_session_request(prompt, &source, branch, title)?;

        let repository = self.repository.clone();
        let prompt = prompt.to_string();
        let branch = branch.map(str::to_string);
        let title = title.map(str::to_string);
        Ok(self.spawn_action(handle, Action::CreateSession, async move {
            let session = repository
                .create_session(&prompt, &source, branch.as_deref(), title.as_deref())
                .await?;
            let sessions = repository.list_sessions_for_source(&source).await?;
            Ok::<_, ActionError>(vec![
                ViewEvent::SessionCreated(session),
                ViewEvent::SessionsLoaded(sessions),
            ])
        }))
    }

    /// Reloads the session (for its state) and its activity feed.
    pub fn refresh_chat(&self, handle: &Arc<ViewHandle<ChatView>>) -> JoinHandle<()> {
        let repository = self.repository.clone();
        let feed = self.feed.clone();
        let session_name = chat_session_name(handle);
        self.spawn_action(handle, Action::Refresh, async move {
            let session = repository.get_session(&session_name).await?;
            let snapshot = feed.load(&session_name).await?;
            Ok::<_, ActionError>(vec![
                ViewEvent::SessionLoaded(session),
                ViewEvent::ActivitiesLoaded(snapshot),
            ])
        })
    }

    /// Blank text is rejected here and nothing is spawned.
    pub fn send_message(
        &self,
        handle: &Arc<ViewHandle<ChatView>>,
        text: &str,
    ) -> Result<JoinHandle<()>, ActionError> {
        let text = require_text(text, "message")?.to_string();
        let dispatcher = self.dispatcher.clone();
        let session_name = chat_session_name(handle);
        Ok(self.spawn_action(handle, Action::SendMessage, async move {
            let snapshot = dispatcher.send_message(&session_name, &text).await?;
            Ok::<_, ActionError>(vec![ViewEvent::MessageSent(snapshot)])
        }))
    }

    pub fn approve_plan(&self, handle: &Arc<ViewHandle<ChatView>>) -> JoinHandle<()> {
        let dispatcher = self.dispatcher.clone();
        let session_name = chat_session_name(handle);
        self.spawn_action(handle, Action::ApprovePlan, async move {
            let (session, feed) = dispatcher.approve_plan(&session_name).await?;
            Ok::<_, ActionError>(vec![ViewEvent::PlanApproved { session, feed }])
        })
    }

    /// Takes the next branch name from the view's counter and asks the agent
    /// to publish to it. Returns the branch name with the task.
    pub fn publish(&self, handle: &Arc<ViewHandle<ChatView>>) -> (String, JoinHandle<()>) {
        let dispatcher = self.dispatcher.clone();
        let (session_name, branch) =
            handle.with_view(|view| (view.session_name.clone(), view.next_publish_branch()));
        let task_branch = branch.clone();
        let task = self.spawn_action(handle, Action::Publish, async move {
            let snapshot = dispatcher
                .publish_to_branch(&session_name, &task_branch)
                .await?;
            Ok::<_, ActionError>(vec![ViewEvent::MessageSent(snapshot)])
        });
        (branch, task)
    }

    pub fn accept_review(&self, handle: &Arc<ViewHandle<ChatView>>) -> JoinHandle<()> {
        let dispatcher = self.dispatcher.clone();
        let session_name = chat_session_name(handle);
        self.spawn_action(handle, Action::AcceptReview, async move {
            let snapshot = dispatcher.accept_review(&session_name).await?;
            Ok::<_, ActionError>(vec![ViewEvent::MessageSent(snapshot)])
        })
    }
}

fn chat_session_name(handle: &Arc<ViewHandle<ChatView>>) -> String {
    handle.with_view(|view| view.session_name.clone())
}

fn deliver<V: View>(
    target: &Weak<ViewHandle<V>>,
    events: Vec<ViewEvent>,
    discarded: &AtomicUsize,
    action: Action,
) {
    match target.upgrade() {
        Some(handle) => handle.enqueue_all(events),
        None => {
            discarded.fetch_add(1, Ordering::SeqCst);
            debug!(action = action.label(), "view closed; discarding result");
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
