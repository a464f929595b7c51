use std::collections::BTreeMap;

use crate::config::JulesApiConfig;
use crate::error::JulesApiError;

pub const HEADER_API_KEY: &str = "x-goog-api-key";
pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_USER_AGENT: &str = "user-agent";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Build a deterministic header map for Jules requests.
pub fn build_headers(
    config: &JulesApiConfig,
    user_agent: Option<&str>,
) -> Result<BTreeMap<String, String>, JulesApiError> {
    let api_key = config.api_key.trim();
    if api_key.is_empty() {
        return Err(JulesApiError::MissingApiKey);
    }

    let mut headers = BTreeMap::new();
    headers.insert(HEADER_API_KEY.to_owned(), api_key.to_owned());
    headers.insert(HEADER_ACCEPT.to_owned(), JSON_MEDIA_TYPE.to_owned());
    headers.insert(HEADER_CONTENT_TYPE.to_owned(), JSON_MEDIA_TYPE.to_owned());

    let ua = match (user_agent, config.user_agent.as_deref()) {
        (Some(explicit), _) if !explicit.trim().is_empty() => explicit.trim().to_owned(),
        (_, Some(explicit)) if !explicit.trim().is_empty() => explicit.trim().to_owned(),
        _ => default_user_agent(),
    };
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in &config.extra_headers {
        let key = key.trim().to_ascii_lowercase();
        // The key header is owned by the config, never by extras.
        if key == HEADER_API_KEY {
            continue;
        }
        headers.insert(key, value.trim().to_owned());
    }

    Ok(headers)
}

pub fn default_user_agent() -> String {
    format!("jules-manager/{}", env!("CARGO_PKG_VERSION"))
}
