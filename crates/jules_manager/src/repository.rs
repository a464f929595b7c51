use std::sync::Arc;

use jules_api::{CreateSessionRequest, Session, Source};
use tracing::debug;

use crate::error::{require_text, ActionError};
use crate::service::JulesService;

/// Sessions whose source reference equals `source` exactly. No case folding,
/// no prefix matching; sessions without a source never match.
pub fn filter_sessions_for_source(sessions: &[Session], source: &str) -> Vec<Session> {
    sessions
        .iter()
        .filter(|session| session.source() == Some(source))
        .cloned()
        .collect()
}

/// Read side for sessions and sources. Holds no cache; every call is a
/// fresh fetch.
#[derive(Clone)]
pub struct SessionRepository {
    service: Arc<dyn JulesService>,
}

impl SessionRepository {
    pub fn new(service: Arc<dyn JulesService>) -> Self {
        Self { service }
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>, ActionError> {
        Ok(self.service.list_sessions().await?)
    }

    /// Fetches every session, then filters client side.
    pub async fn list_sessions_for_source(&self, source: &str) -> Result<Vec<Session>, ActionError> {
        let sessions = self.service.list_sessions().await?;
        let matching = filter_sessions_for_source(&sessions, source);
        debug!(
            source,
            total = sessions.len(),
            matching = matching.len(),
            "filtered sessions for source"
        );
        Ok(matching)
    }

    pub async fn list_sources(&self) -> Result<Vec<Source>, ActionError> {
        Ok(self.service.list_sources().await?)
    }

    pub async fn get_session(&self, session_name: &str) -> Result<Session, ActionError> {
        Ok(self.service.get_session(session_name).await?)
    }

    pub async fn create_session(
        &self,
        prompt: &str,
        source: &str,
        branch: Option<&str>,
        title: Option<&str>,
    ) -> Result<Session, ActionError> {
        let request = new_session_request(prompt, source, branch, title)?;
        let session = self.service.create_session(&request).await?;
        debug!(session = %session.name, source, "created session");
        Ok(session)
    }
}

/// Validates and builds a create request without dispatching it.
pub fn new_session_request(
    prompt: &str,
    source: &str,
    branch: Option<&str>,
    title: Option<&str>,
) -> Result<CreateSessionRequest, ActionError> {
    let prompt = require_text(prompt, "prompt")?;
    let source = require_text(source, "source")?;

    let mut request = CreateSessionRequest::new(prompt, source);
    if let Some(branch) = branch {
        request = request.with_branch(branch);
    }
    if let Some(title) = title {
        request = request.with_title(title);
    }
    Ok(request)
}
