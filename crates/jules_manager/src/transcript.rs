//! Chat transcript built from a session's activity log.
//!
//! Only user and agent messages enter the transcript; everything else in the
//! log (plans, progress, unknown kinds) is skipped. Server order is kept as
//! is. Long messages are shown collapsed until expanded, and expansion is
//! tracked by message id so it survives any reordering of the displayed list.

use std::borrow::Cow;
use std::collections::HashSet;

use jules_api::{Activity, ActivityPayload, Plan};
use jules_view::truncate_chars;

/// Messages longer than this many characters are collapsed by default.
pub const TRUNCATE_THRESHOLD: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Agent,
}

impl Author {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Agent => "Jules",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptMessage {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub create_time: Option<String>,
}

impl TranscriptMessage {
    pub fn is_truncatable(&self) -> bool {
        self.text.chars().count() > TRUNCATE_THRESHOLD
    }
}

/// User and agent messages from `activities`, in the order given.
pub fn transcript_messages(activities: &[Activity]) -> Vec<TranscriptMessage> {
    activities
        .iter()
        .filter_map(|activity| {
            let (author, text) = match &activity.payload {
                ActivityPayload::UserMessage { text } => (Author::User, text),
                ActivityPayload::AgentMessage { text } => (Author::Agent, text),
                ActivityPayload::PlanGenerated { .. } | ActivityPayload::Other { .. } => {
                    return None
                }
            };
            Some(TranscriptMessage {
                id: activity.key().to_string(),
                author,
                text: text.clone(),
                create_time: activity.create_time.clone(),
            })
        })
        .collect()
}

/// The most recently generated plan in the log, if any.
pub fn plan_steps(activities: &[Activity]) -> Option<Plan> {
    activities
        .iter()
        .rev()
        .find_map(|activity| match &activity.payload {
            ActivityPayload::PlanGenerated { plan } => Some(plan.clone()),
            _ => None,
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<TranscriptMessage>,
    expanded: HashSet<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<TranscriptMessage>) -> Self {
        Self {
            messages,
            expanded: HashSet::new(),
        }
    }

    /// Swap in a freshly loaded list. Every message starts collapsed again.
    pub fn replace(&mut self, messages: Vec<TranscriptMessage>) {
        self.messages = messages;
        self.expanded.clear();
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TranscriptMessage> {
        self.messages.iter().find(|message| message.id == id)
    }

    /// Id of the message at 1-based display position `position`.
    pub fn id_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.messages.get(index))
            .map(|message| message.id.as_str())
    }

    pub fn is_truncatable(&self, id: &str) -> bool {
        self.get(id).is_some_and(TranscriptMessage::is_truncatable)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip the expansion of one message. Returns the new state, or `None`
    /// when the id is unknown or the message is short enough to never
    /// collapse.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        if !self.is_truncatable(id) {
            return None;
        }
        if self.expanded.remove(id) {
            Some(false)
        } else {
            self.expanded.insert(id.to_string());
            Some(true)
        }
    }

    pub fn display_text(&self, id: &str) -> Option<Cow<'_, str>> {
        let message = self.get(id)?;
        if self.is_expanded(id) {
            return Some(Cow::Borrowed(message.text.as_str()));
        }
        Some(truncate_chars(&message.text, TRUNCATE_THRESHOLD))
    }
}

#[cfg(test)]
mod tests {
    use super::{Author, Transcript, TranscriptMessage, TRUNCATE_THRESHOLD};

    fn message(id: &str, text: &str) -> TranscriptMessage {
        TranscriptMessage {
            id: id.to_string(),
            author: Author::Agent,
            text: text.to_string(),
            create_time: None,
        }
    }

    #[test]
    fn short_messages_never_collapse() {
        let mut transcript = Transcript::from_messages(vec![message("a", "short")]);
        assert!(!transcript.is_truncatable("a"));
        assert_eq!(transcript.toggle("a"), None);
        assert_eq!(transcript.display_text("a").as_deref(), Some("short"));
    }

    #[test]
    fn exactly_threshold_length_is_not_truncated() {
        let text = "x".repeat(TRUNCATE_THRESHOLD);
        let transcript = Transcript::from_messages(vec![message("a", &text)]);
        assert!(!transcript.is_truncatable("a"));
        assert_eq!(transcript.display_text("a").as_deref(), Some(text.as_str()));
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        let text = "é".repeat(TRUNCATE_THRESHOLD);
        let transcript = Transcript::from_messages(vec![message("a", &text)]);
        assert!(!transcript.is_truncatable("a"));
    }

    #[test]
    fn id_at_is_one_based() {
        let transcript = Transcript::from_messages(vec![message("a", "1"), message("b", "2")]);
        assert_eq!(transcript.id_at(0), None);
        assert_eq!(transcript.id_at(1), Some("a"));
        assert_eq!(transcript.id_at(2), Some("b"));
        assert_eq!(transcript.id_at(3), None);
    }

    #[test]
    fn unknown_id_has_no_display_text() {
        let transcript = Transcript::new();
        assert!(transcript.display_text("missing").is_none());
    }
}
