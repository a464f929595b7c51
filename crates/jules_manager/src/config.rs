use std::path::PathBuf;
use std::time::Duration;

use jules_api::JulesApiConfig;

pub const API_KEY_ENV_VAR: &str = "JULES_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "JULES_BASE_URL";
pub const CONFIG_DIR_ENV_VAR: &str = credential_store::CONFIG_DIR_ENV_VAR;
pub const LOG_ENV_VAR: &str = "JULES_MANAGER_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const DEFAULT_RENDER_WIDTH: usize = 80;

/// Settings read from the process environment. Command-line flags are
/// layered on top by the binary.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub config_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("config_dir", &self.config_dir)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            api_key: read(API_KEY_ENV_VAR),
            base_url: read(BASE_URL_ENV_VAR),
            config_dir: read(CONFIG_DIR_ENV_VAR).map(PathBuf::from),
            log_filter: read(LOG_ENV_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    pub fn api_config(
        &self,
        api_key: &str,
        base_url_override: Option<&str>,
        timeout: Option<Duration>,
    ) -> JulesApiConfig {
        let mut config = JulesApiConfig::new(api_key);
        if let Some(base_url) = base_url_override.or(self.base_url.as_deref()) {
            config = config.with_base_url(base_url);
        }
        if let Some(timeout) = timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::{EnvConfig, DEFAULT_LOG_FILTER};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = EnvConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, None);
        assert_eq!(config.config_dir, None);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn values_are_trimmed_and_blanks_ignored() {
        let config = EnvConfig::from_lookup(lookup(&[
            ("JULES_API_KEY", "  abc123 "),
            ("JULES_BASE_URL", "   "),
            ("JULES_MANAGER_CONFIG_DIR", "/tmp/jules"),
            ("JULES_MANAGER_LOG", "debug"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.base_url, None);
        assert_eq!(config.config_dir, Some(PathBuf::from("/tmp/jules")));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn flag_base_url_beats_environment() {
        let config = EnvConfig::from_lookup(lookup(&[("JULES_BASE_URL", "http://env.test")]));
        assert_eq!(
            config.api_config("k", None, None).base_url,
            "http://env.test"
        );
        assert_eq!(
            config.api_config("k", Some("http://flag.test"), None).base_url,
            "http://flag.test"
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = EnvConfig::from_lookup(lookup(&[("JULES_API_KEY", "secret-key")]));
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
