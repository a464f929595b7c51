//! Read models returned by the Jules API.
//!
//! All of these are transient: the client never holds an authoritative copy
//! and every fetch replaces the previous value wholesale.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A registered code repository the service can operate against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<GitHubRepo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepo {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<Branch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(default)]
    pub display_name: String,
}

impl Source {
    /// `owner/repo` when a repository is linked, else the last segment of the
    /// source name.
    pub fn display_name(&self) -> String {
        match &self.github_repo {
            Some(repo) if !repo.owner.is_empty() || !repo.repo.is_empty() => {
                format!("{}/{}", repo.owner, repo.repo)
            }
            _ => last_segment(&self.name).to_string(),
        }
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.github_repo
            .as_ref()
            .and_then(|repo| repo.default_branch.as_ref())
            .map(|branch| branch.display_name.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// A server-tracked unit of work tied to one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub state: SessionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_context: Option<SessionSourceContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSourceContext {
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Session {
    pub fn source(&self) -> Option<&str> {
        self.source_context
            .as_ref()
            .map(|context| context.source.as_str())
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or("Untitled")
    }

    /// Trailing segment of the session name, e.g. `123` for `sessions/123`.
    pub fn short_name(&self) -> &str {
        last_segment(&self.name)
    }
}

/// Session state label. Free text on the wire; the client only uses it to
/// pick display affordances and never drives transitions of its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    Completed,
    Failed,
    AwaitingUserFeedback,
    AwaitingPlanApproval,
    Other(String),
    #[default]
    Unspecified,
}

const STATE_COMPLETED: &str = "COMPLETED";
const STATE_FAILED: &str = "FAILED";
const STATE_AWAITING_USER_FEEDBACK: &str = "AWAITING_USER_FEEDBACK";
const STATE_AWAITING_PLAN_APPROVAL: &str = "AWAITING_PLAN_APPROVAL";
const STATE_UNSPECIFIED: &str = "STATE_UNSPECIFIED";

impl SessionState {
    pub fn parse(value: &str) -> Self {
        match value {
            STATE_COMPLETED => Self::Completed,
            STATE_FAILED => Self::Failed,
            STATE_AWAITING_USER_FEEDBACK => Self::AwaitingUserFeedback,
            STATE_AWAITING_PLAN_APPROVAL => Self::AwaitingPlanApproval,
            "" | STATE_UNSPECIFIED => Self::Unspecified,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => STATE_COMPLETED,
            Self::Failed => STATE_FAILED,
            Self::AwaitingUserFeedback => STATE_AWAITING_USER_FEEDBACK,
            Self::AwaitingPlanApproval => STATE_AWAITING_PLAN_APPROVAL,
            Self::Other(value) => value,
            Self::Unspecified => STATE_UNSPECIFIED,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SessionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// One timestamped event in a session's log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ActivityWire")]
pub struct Activity {
    pub name: String,
    pub id: Option<String>,
    pub create_time: Option<String>,
    pub originator: Option<String>,
    pub payload: ActivityPayload,
}

/// Exactly one payload kind per activity. Kinds this client does not know
/// decode to [`ActivityPayload::Other`] instead of failing the whole list.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityPayload {
    UserMessage { text: String },
    AgentMessage { text: String },
    PlanGenerated { plan: Plan },
    Other { kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Activity {
    /// Stable identifier: the `id` field when present, else the resource name.
    pub fn key(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn kind(&self) -> &str {
        match &self.payload {
            ActivityPayload::UserMessage { .. } => "userMessaged",
            ActivityPayload::AgentMessage { .. } => "agentMessaged",
            ActivityPayload::PlanGenerated { .. } => "planGenerated",
            ActivityPayload::Other { kind } => kind,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    create_time: Option<String>,
    #[serde(default)]
    originator: Option<String>,
    #[serde(default)]
    user_messaged: Option<UserMessaged>,
    #[serde(default)]
    agent_messaged: Option<AgentMessaged>,
    #[serde(default)]
    plan_generated: Option<PlanGenerated>,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserMessaged {
    #[serde(default)]
    user_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentMessaged {
    #[serde(default)]
    agent_message: String,
}

#[derive(Debug, Deserialize)]
struct PlanGenerated {
    #[serde(default)]
    plan: Plan,
}

/// Keys that ride along with any payload and never name a kind.
const ACTIVITY_METADATA_KEYS: [&str; 2] = ["description", "artifacts"];

impl From<ActivityWire> for Activity {
    fn from(wire: ActivityWire) -> Self {
        let payload = if let Some(user) = wire.user_messaged {
            ActivityPayload::UserMessage {
                text: user.user_message,
            }
        } else if let Some(agent) = wire.agent_messaged {
            ActivityPayload::AgentMessage {
                text: agent.agent_message,
            }
        } else if let Some(plan) = wire.plan_generated {
            ActivityPayload::PlanGenerated { plan: plan.plan }
        } else {
            let kind = wire
                .rest
                .keys()
                .find(|key| !ACTIVITY_METADATA_KEYS.contains(&key.as_str()))
                .cloned()
                .unwrap_or_else(|| "unknown".to_owned());
            ActivityPayload::Other { kind }
        };

        Self {
            name: wire.name,
            id: wire.id,
            create_time: wire.create_time,
            originator: wire.originator,
            payload,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SourcePage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<Source>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivityPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub activities: Vec<Activity>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn last_segment(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
