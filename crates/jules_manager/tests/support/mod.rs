#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use jules_api::{
    Activity, ActivityPayload, Branch, CreateSessionRequest, GitHubRepo, JulesApiError, Plan,
    PlanStep, Session, SessionSourceContext, SessionState, Source, StatusCode,
};
use jules_manager::JulesService;
use tokio::sync::Notify;

/// What the fake server holds and what it has been asked to do.
#[derive(Default)]
pub struct ServerState {
    pub sessions: Vec<Session>,
    pub sources: Vec<Source>,
    pub activities: HashMap<String, Vec<Activity>>,
    pub calls: Vec<String>,
    pub sent_messages: Vec<(String, String)>,
    pub approved: Vec<String>,
    pub created: Vec<CreateSessionRequest>,
    /// Every call fails with this status while set.
    pub failure: Option<(StatusCode, String)>,
    /// The next `list_sessions` call takes this and waits on it before
    /// answering. Later calls answer straight away.
    pub list_gate: Option<Arc<Notify>>,
    next_id: u32,
}

#[derive(Clone, Default)]
pub struct FakeService {
    state: Arc<Mutex<ServerState>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, ServerState> {
        lock_unpoisoned(&self.state)
    }

    pub fn with_sessions(self, sessions: Vec<Session>) -> Self {
        self.state().sessions = sessions;
        self
    }

    pub fn with_sources(self, sources: Vec<Source>) -> Self {
        self.state().sources = sources;
        self
    }

    pub fn with_activities(self, session_name: &str, activities: Vec<Activity>) -> Self {
        self.state()
            .activities
            .insert(session_name.to_string(), activities);
        self
    }

    pub fn fail_with(&self, status: StatusCode, message: &str) {
        self.state().failure = Some((status, message.to_string()));
    }

    pub fn recover(&self) {
        self.state().failure = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn record(&self, call: String) -> Result<(), JulesApiError> {
        let mut state = self.state();
        state.calls.push(call);
        match &state.failure {
            Some((status, message)) => Err(JulesApiError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn find_session(&self, session_name: &str) -> Result<Session, JulesApiError> {
        self.state()
            .sessions
            .iter()
            .find(|session| session.name == session_name)
            .cloned()
            .ok_or_else(|| JulesApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: format!("{session_name} not found"),
            })
    }
}

#[async_trait]
impl JulesService for FakeService {
    async fn list_sessions(&self) -> Result<Vec<Session>, JulesApiError> {
        let gate = self.state().list_gate.take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("list_sessions".to_string())?;
        Ok(self.state().sessions.clone())
    }

    async fn list_sources(&self) -> Result<Vec<Source>, JulesApiError> {
        self.record("list_sources".to_string())?;
        Ok(self.state().sources.clone())
    }

    async fn get_session(&self, session_name: &str) -> Result<Session, JulesApiError> {
        self.record(format!("get_session {session_name}"))?;
        self.find_session(session_name)
    }

    async fn list_activities(&self, session_name: &str) -> Result<Vec<Activity>, JulesApiError> {
        self.record(format!("list_activities {session_name}"))?;
        Ok(self
            .state()
            .activities
            .get(session_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<Session, JulesApiError> {
        self.record("create_session".to_string())?;
        let mut state = self.state();
        state.next_id += 1;
        let mut created = session(
            &format!("sessions/new-{}", state.next_id),
            Some(&request.source_context.source),
            "QUEUED",
        );
        created.title = request.title.clone();
        created.prompt = Some(request.prompt.clone());
        state.created.push(request.clone());
        state.sessions.insert(0, created.clone());
        Ok(created)
    }

    /// Sent messages show up in the activity log as user messages.
    async fn send_message(&self, session_name: &str, message: &str) -> Result<(), JulesApiError> {
        self.record(format!("send_message {session_name}"))?;
        let mut state = self.state();
        state
            .sent_messages
            .push((session_name.to_string(), message.to_string()));
        let log = state.activities.entry(session_name.to_string()).or_default();
        let id = format!("sent-{}", log.len() + 1);
        log.push(user_message(&id, message));
        Ok(())
    }

    /// Approval completes the session, the way the server eventually does.
    async fn approve_plan(&self, session_name: &str) -> Result<(), JulesApiError> {
        self.record(format!("approve_plan {session_name}"))?;
        let mut state = self.state();
        state.approved.push(session_name.to_string());
        if let Some(session) = state
            .sessions
            .iter_mut()
            .find(|session| session.name == session_name)
        {
            session.state = SessionState::Completed;
        }
        Ok(())
    }
}

pub fn session(name: &str, source: Option<&str>, state: &str) -> Session {
    Session {
        name: name.to_string(),
        id: name.rsplit('/').next().map(str::to_string),
        title: Some(format!("Title of {name}")),
        prompt: None,
        state: SessionState::parse(state),
        source_context: source.map(|source| SessionSourceContext {
            source: source.to_string(),
            branch: None,
        }),
        url: None,
        create_time: None,
        update_time: None,
    }
}

pub fn github_source(owner: &str, repo: &str) -> Source {
    Source {
        name: format!("sources/github/{owner}/{repo}"),
        id: Some(format!("github/{owner}/{repo}")),
        github_repo: Some(GitHubRepo {
            owner: owner.to_string(),
            repo: repo.to_string(),
            is_private: Some(false),
            default_branch: Some(Branch {
                display_name: "main".to_string(),
            }),
        }),
    }
}

fn activity(id: &str, payload: ActivityPayload) -> Activity {
    Activity {
        name: format!("sessions/1/activities/{id}"),
        id: Some(id.to_string()),
        create_time: Some("2025-01-01T00:00:00Z".to_string()),
        originator: None,
        payload,
    }
}

pub fn user_message(id: &str, text: &str) -> Activity {
    activity(
        id,
        ActivityPayload::UserMessage {
            text: text.to_string(),
        },
    )
}

pub fn agent_message(id: &str, text: &str) -> Activity {
    activity(
        id,
        ActivityPayload::AgentMessage {
            text: text.to_string(),
        },
    )
}

pub fn plan_generated(id: &str, steps: &[(&str, &str)]) -> Activity {
    activity(
        id,
        ActivityPayload::PlanGenerated {
            plan: Plan {
                id: Some(format!("plan-{id}")),
                steps: steps
                    .iter()
                    .enumerate()
                    .map(|(index, (title, description))| PlanStep {
                        id: None,
                        index: Some(index as u32),
                        title: title.to_string(),
                        description: Some(description.to_string()),
                    })
                    .collect(),
            },
        },
    )
}

pub fn other_activity(id: &str, kind: &str) -> Activity {
    activity(
        id,
        ActivityPayload::Other {
            kind: kind.to_string(),
        },
    )
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
