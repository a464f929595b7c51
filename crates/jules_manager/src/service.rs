use async_trait::async_trait;
use jules_api::{Activity, CreateSessionRequest, JulesApiClient, JulesApiError, Session, Source};

/// The remote operations the manager depends on.
///
/// [`JulesApiClient`] is the production implementation. Everything above this
/// seam receives an `Arc<dyn JulesService>` so tests can substitute an
/// in-memory double.
#[async_trait]
pub trait JulesService: Send + Sync {
    async fn list_sessions(&self) -> Result<Vec<Session>, JulesApiError>;
    async fn list_sources(&self) -> Result<Vec<Source>, JulesApiError>;
    async fn get_session(&self, session_name: &str) -> Result<Session, JulesApiError>;
    async fn list_activities(&self, session_name: &str) -> Result<Vec<Activity>, JulesApiError>;
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<Session, JulesApiError>;
    async fn send_message(&self, session_name: &str, message: &str) -> Result<(), JulesApiError>;
    async fn approve_plan(&self, session_name: &str) -> Result<(), JulesApiError>;
}

#[async_trait]
impl JulesService for JulesApiClient {
    async fn list_sessions(&self) -> Result<Vec<Session>, JulesApiError> {
        JulesApiClient::list_sessions(self).await
    }

    async fn list_sources(&self) -> Result<Vec<Source>, JulesApiError> {
        JulesApiClient::list_sources(self).await
    }

    async fn get_session(&self, session_name: &str) -> Result<Session, JulesApiError> {
        JulesApiClient::get_session(self, session_name).await
    }

    async fn list_activities(&self, session_name: &str) -> Result<Vec<Activity>, JulesApiError> {
        JulesApiClient::list_activities(self, session_name).await
    }

    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<Session, JulesApiError> {
        JulesApiClient::create_session(self, request).await
    }

    async fn send_message(&self, session_name: &str, message: &str) -> Result<(), JulesApiError> {
        JulesApiClient::send_message(self, session_name, message).await
    }

    async fn approve_plan(&self, session_name: &str) -> Result<(), JulesApiError> {
        JulesApiClient::approve_plan(self, session_name).await
    }
}
