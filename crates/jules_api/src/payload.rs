use serde::{Deserialize, Serialize};

/// Body for `POST /sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub prompt: String,
    pub source_context: SourceContextRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContextRequest {
    pub source: String,
    /// Omitted from the body when unset; the service has rejected requests
    /// carrying a branch it could not resolve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl CreateSessionRequest {
    pub fn new(prompt: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            source_context: SourceContextRequest {
                source: source.into(),
                branch: None,
            },
            title: None,
        }
    }

    /// Blank branch names are treated as unset.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        let branch = branch.into();
        let branch = branch.trim();
        self.source_context.branch = (!branch.is_empty()).then(|| branch.to_owned());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        let title = title.trim();
        self.title = (!title.is_empty()).then(|| title.to_owned());
        self
    }
}

/// Body for `POST /{session}:sendMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

impl SendMessageRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body for `POST /{session}:approvePlan`; always serializes to `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovePlanRequest {}
