//! Transport-only client for the Jules session API.
//!
//! This crate owns request building, response decoding and error mapping for
//! the `v1alpha` session endpoints. It holds no credential storage and no UI
//! coupling: callers construct a [`JulesApiClient`] from an explicit
//! [`JulesApiConfig`] and pass it down to whatever needs it.
//!
//! Every operation is a single request/response round trip. Failures are never
//! retried here; a retry is always a fresh caller-initiated call.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod model;
pub mod payload;
pub mod url;

pub use client::JulesApiClient;
pub use config::JulesApiConfig;
pub use error::JulesApiError;
pub use model::{
    Activity, ActivityPayload, Branch, GitHubRepo, Plan, PlanStep, Session, SessionSourceContext,
    SessionState, Source,
};
pub use payload::{ApprovePlanRequest, CreateSessionRequest, SendMessageRequest, SourceContextRequest};
pub use reqwest::StatusCode;
pub use url::{normalize_base_url, DEFAULT_API_VERSION, DEFAULT_JULES_BASE_URL};
