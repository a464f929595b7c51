use std::collections::BTreeMap;
use std::time::Duration;

use crate::url::{DEFAULT_API_VERSION, DEFAULT_JULES_BASE_URL};

/// Transport configuration for Jules API requests.
#[derive(Clone)]
pub struct JulesApiConfig {
    /// Static key sent in the `X-Goog-Api-Key` header on every request.
    pub api_key: String,
    /// Base URL for all endpoints.
    pub base_url: String,
    /// Versioned path prefix, `v1alpha` by default.
    pub api_version: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for JulesApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_JULES_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

// Hand-written so the key never ends up in logs or panic messages.
impl std::fmt::Debug for JulesApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JulesApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("user_agent", &self.user_agent)
            .field("extra_headers", &self.extra_headers)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl JulesApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::JulesApiConfig;

    #[test]
    fn debug_output_redacts_api_key() {
        let config = JulesApiConfig::new("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
