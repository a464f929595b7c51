use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JulesApiError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid header: {name}")]
    InvalidHeader { name: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request failed: HTTP {status} {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl JulesApiError {
    /// Transport, status and decode failures are one generic "request
    /// failed" condition for callers; only input problems are distinguished.
    #[must_use]
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::Status { .. } | Self::Decode { .. }
        )
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(error) => error.status(),
            _ => None,
        }
    }

    /// Human-readable message suitable for a transient notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayloadFields {
    message: Option<String>,
    status: Option<String>,
}

/// Extract a readable message from a non-2xx response body.
///
/// Google-style bodies (`{"error": {"message": .., "status": ..}}`) yield the
/// message, then the status string. Anything else falls back to the raw body
/// and finally to the canonical reason phrase.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(ErrorPayload { error: Some(fields) }) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = fields.message.as_deref().and_then(non_empty_string) {
            return message.to_owned();
        }
        if let Some(status_text) = fields.status.as_deref().and_then(non_empty_string) {
            return status_text.to_owned();
        }
    }

    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

fn non_empty_string(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
