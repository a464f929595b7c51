use std::sync::Arc;

use jules_api::{Session, SessionState};
use tracing::{debug, info};

use crate::error::{require_text, ActionError};
use crate::feed::{ActivityFeed, FeedSnapshot};
use crate::service::JulesService;

pub const PUBLISH_BRANCH_PREFIX: &str = "feature/change";
pub const ACCEPT_REVIEW_MESSAGE: &str = "I accept the review. Please proceed.";

/// The instruction sent for "publish to branch". Publishing has no API
/// operation of its own; the agent acts on this chat message.
pub fn publish_message(branch: &str) -> String {
    format!("Please publish the changes to a new branch named {branch} and create a PR.")
}

/// Plan approval controls are shown only while the session waits on one.
pub fn show_plan_controls(state: &SessionState) -> bool {
    state.as_str() == "AWAITING_PLAN_APPROVAL"
}

/// Issues `feature/change1`, `feature/change2`, ... for one chat view.
/// Never persisted; a new view starts over at 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchCounter {
    issued: u32,
}

impl BranchCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_branch(&mut self) -> String {
        self.issued += 1;
        format!("{PUBLISH_BRANCH_PREFIX}{}", self.issued)
    }

    pub fn issued(&self) -> u32 {
        self.issued
    }
}

/// Write side of the chat: every action posts, then reloads from the server.
/// Nothing is inserted locally ahead of the reload.
#[derive(Clone)]
pub struct ActionDispatcher {
    service: Arc<dyn JulesService>,
    feed: ActivityFeed,
}

impl ActionDispatcher {
    pub fn new(service: Arc<dyn JulesService>) -> Self {
        Self {
            feed: ActivityFeed::new(Arc::clone(&service)),
            service,
        }
    }

    pub async fn send_message(
        &self,
        session_name: &str,
        text: &str,
    ) -> Result<FeedSnapshot, ActionError> {
        let session_name = require_text(session_name, "session name")?;
        let text = require_text(text, "message")?;

        self.service.send_message(session_name, text).await?;
        debug!(session = session_name, chars = text.chars().count(), "sent message");
        self.feed.load(session_name).await
    }

    /// Approves the pending plan, then reloads the session and its feed.
    pub async fn approve_plan(
        &self,
        session_name: &str,
    ) -> Result<(Session, FeedSnapshot), ActionError> {
        let session_name = require_text(session_name, "session name")?;

        self.service.approve_plan(session_name).await?;
        info!(session = session_name, "approved plan");
        let session = self.service.get_session(session_name).await?;
        let feed = self.feed.load(session_name).await?;
        Ok((session, feed))
    }

    pub async fn publish_to_branch(
        &self,
        session_name: &str,
        branch: &str,
    ) -> Result<FeedSnapshot, ActionError> {
        info!(session = session_name, branch, "requesting publish");
        self.send_message(session_name, &publish_message(branch)).await
    }

    pub async fn accept_review(&self, session_name: &str) -> Result<FeedSnapshot, ActionError> {
        self.send_message(session_name, ACCEPT_REVIEW_MESSAGE).await
    }
}

#[cfg(test)]
mod tests {
    use super::{publish_message, show_plan_controls, BranchCounter};
    use jules_api::SessionState;

    #[test]
    fn publish_message_embeds_branch_name() {
        assert_eq!(
            publish_message("feature/change3"),
            "Please publish the changes to a new branch named feature/change3 and create a PR."
        );
    }

    #[test]
    fn counter_starts_at_one_and_never_repeats() {
        let mut counter = BranchCounter::new();
        let branches: Vec<String> = (0..4).map(|_| counter.next_branch()).collect();
        assert_eq!(
            branches,
            vec![
                "feature/change1",
                "feature/change2",
                "feature/change3",
                "feature/change4"
            ]
        );
        assert_eq!(counter.issued(), 4);
        assert_eq!(BranchCounter::new().next_branch(), "feature/change1");
    }

    #[test]
    fn plan_controls_follow_the_sentinel_state_only() {
        assert!(show_plan_controls(&SessionState::AwaitingPlanApproval));
        assert!(show_plan_controls(&SessionState::parse("AWAITING_PLAN_APPROVAL")));
        assert!(!show_plan_controls(&SessionState::Completed));
        assert!(!show_plan_controls(&SessionState::AwaitingUserFeedback));
        assert!(!show_plan_controls(&SessionState::parse("awaiting_plan_approval")));
        assert!(!show_plan_controls(&SessionState::Unspecified));
    }
}
