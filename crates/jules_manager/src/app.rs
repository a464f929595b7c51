//! View state for the three screens and the events that update them.
//!
//! Views never call the network. They are told an action started
//! ([`View::begin_action`]) and later receive its result as a [`ViewEvent`].
//! Loads replace the displayed data wholesale; a failure leaves the previous
//! data on screen, clears the refresh indicator and sets a notice.

use jules_api::{Plan, Session, Source};

use crate::dispatcher::{show_plan_controls, BranchCounter};
use crate::feed::FeedSnapshot;
use crate::transcript::Transcript;

pub const DASHBOARD_TITLE: &str = "Jules Dashboard";
pub const EMPTY_CODEBASE_NOTICE: &str = "No sessions found for this codebase";

/// A user-triggered operation. Used to label results and failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
    CreateSession,
    SendMessage,
    ApprovePlan,
    Publish,
    AcceptReview,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::CreateSession => "create session",
            Self::SendMessage => "send message",
            Self::ApprovePlan => "approve plan",
            Self::Publish => "publish",
            Self::AcceptReview => "accept review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SessionsLoaded(Vec<Session>),
    SourcesLoaded(Vec<Source>),
    SessionLoaded(Session),
    ActivitiesLoaded(FeedSnapshot),
    SessionCreated(Session),
    MessageSent(FeedSnapshot),
    PlanApproved { session: Session, feed: FeedSnapshot },
    Failed { action: Action, message: String },
}

pub trait View: Send + 'static {
    fn begin_action(&mut self, action: Action);
    fn apply(&mut self, event: ViewEvent);
}

fn failure_notice(action: Action, message: &str) -> String {
    format!("Could not {}: {message}", action.label())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardTab {
    #[default]
    RecentSessions,
    Codebases,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 2] = [DashboardTab::RecentSessions, DashboardTab::Codebases];

    pub fn title(self) -> &'static str {
        match self {
            Self::RecentSessions => "Recent Sessions",
            Self::Codebases => "Codebases",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::RecentSessions => 0,
            Self::Codebases => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub tab: DashboardTab,
    pub sessions: Vec<Session>,
    pub sources: Vec<Source>,
    pub refreshing: bool,
    pub notice: Option<String>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
    }
}

impl View for DashboardView {
    fn begin_action(&mut self, _action: Action) {
        self.refreshing = true;
        self.notice = None;
    }

    fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SessionsLoaded(sessions) => {
                self.sessions = sessions;
                self.refreshing = false;
            }
            ViewEvent::SourcesLoaded(sources) => {
                self.sources = sources;
                self.refreshing = false;
            }
            ViewEvent::Failed { action, message } => {
                self.refreshing = false;
                self.notice = Some(failure_notice(action, &message));
            }
            _ => {}
        }
    }
}

/// Sessions of one codebase, plus creating new ones against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodebaseView {
    pub source: Source,
    pub sessions: Vec<Session>,
    pub refreshing: bool,
    pub notice: Option<String>,
    /// Set when a create succeeds; the caller opens the chat for it.
    pub created: Option<Session>,
}

impl CodebaseView {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            sessions: Vec::new(),
            refreshing: false,
            notice: None,
            created: None,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source.name
    }

    pub fn take_created(&mut self) -> Option<Session> {
        self.created.take()
    }
}

impl View for CodebaseView {
    fn begin_action(&mut self, _action: Action) {
        self.refreshing = true;
        self.notice = None;
    }

    fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SessionsLoaded(sessions) => {
                self.sessions = sessions;
                self.refreshing = false;
            }
            ViewEvent::SessionCreated(session) => {
                self.notice = Some(format!("Created {}", session.display_title()));
                self.created = Some(session);
            }
            ViewEvent::Failed { action, message } => {
                self.refreshing = false;
                self.notice = Some(failure_notice(action, &message));
            }
            _ => {}
        }
    }
}

/// One session's conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub session_name: String,
    pub session: Option<Session>,
    pub transcript: Transcript,
    pub plan: Option<Plan>,
    pub show_plan_controls: bool,
    pub branch_counter: BranchCounter,
    pub refreshing: bool,
    pub notice: Option<String>,
}

impl ChatView {
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
            session: None,
            transcript: Transcript::new(),
            plan: None,
            show_plan_controls: false,
            branch_counter: BranchCounter::new(),
            refreshing: false,
            notice: None,
        }
    }

    /// Last path segment of the session name, e.g. `42` for `sessions/42`.
    pub fn subtitle(&self) -> &str {
        self.session_name
            .rsplit('/')
            .next()
            .unwrap_or(&self.session_name)
    }

    pub fn next_publish_branch(&mut self) -> String {
        self.branch_counter.next_branch()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    fn apply_session(&mut self, session: Session) {
        self.show_plan_controls = show_plan_controls(&session.state);
        self.session = Some(session);
    }

    fn apply_feed(&mut self, feed: FeedSnapshot) {
        self.transcript.replace(feed.messages);
        self.plan = feed.plan;
    }
}

impl View for ChatView {
    fn begin_action(&mut self, _action: Action) {
        self.refreshing = true;
        self.notice = None;
    }

    fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SessionLoaded(session) => self.apply_session(session),
            ViewEvent::ActivitiesLoaded(feed) | ViewEvent::MessageSent(feed) => {
                self.apply_feed(feed);
                self.refreshing = false;
            }
            ViewEvent::PlanApproved { session, feed } => {
                self.apply_session(session);
                self.apply_feed(feed);
                self.refreshing = false;
            }
            ViewEvent::Failed { action, message } => {
                self.refreshing = false;
                self.notice = Some(failure_notice(action, &message));
            }
            _ => {}
        }
    }
}
