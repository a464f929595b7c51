use std::sync::Arc;

use jules_api::Plan;
use tracing::debug;

use crate::error::{require_text, ActionError};
use crate::service::JulesService;
use crate::transcript::{plan_steps, transcript_messages, TranscriptMessage};

/// One fetch of a session's activity log, reduced to what the chat shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub messages: Vec<TranscriptMessage>,
    /// Latest generated plan, kept beside the transcript rather than in it.
    pub plan: Option<Plan>,
}

#[derive(Clone)]
pub struct ActivityFeed {
    service: Arc<dyn JulesService>,
}

impl ActivityFeed {
    pub fn new(service: Arc<dyn JulesService>) -> Self {
        Self { service }
    }

    /// User and agent messages of `session_name`, in server order.
    pub async fn load_activities(
        &self,
        session_name: &str,
    ) -> Result<Vec<TranscriptMessage>, ActionError> {
        Ok(self.load(session_name).await?.messages)
    }

    pub async fn load(&self, session_name: &str) -> Result<FeedSnapshot, ActionError> {
        let session_name = require_text(session_name, "session name")?;
        let activities = self.service.list_activities(session_name).await?;
        let snapshot = FeedSnapshot {
            messages: transcript_messages(&activities),
            plan: plan_steps(&activities),
        };
        debug!(
            session = session_name,
            activities = activities.len(),
            messages = snapshot.messages.len(),
            "loaded activity feed"
        );
        Ok(snapshot)
    }
}
