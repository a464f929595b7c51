use jules_api::headers::{
    build_headers, default_user_agent, HEADER_ACCEPT, HEADER_API_KEY,
    HEADER_CONTENT_TYPE, HEADER_USER_AGENT,
};
use jules_api::{JulesApiConfig, JulesApiError};

#[test]
fn headers_carry_api_key_and_json_content_type() {
    let config = JulesApiConfig::new("  abc123  ");
    let headers = build_headers(&config, None).expect("headers");

    assert_eq!(headers.get(HEADER_API_KEY).map(String::as_str), Some("abc123"));
    assert_eq!(
        headers.get(HEADER_CONTENT_TYPE).map(String::as_str),
        Some("application/json")
    );
    assert_eq!(headers.get(HEADER_ACCEPT).map(String::as_str), Some("application/json"));
    assert_eq!(
        headers.get(HEADER_USER_AGENT).cloned(),
        Some(default_user_agent())
    );
}

#[test]
fn headers_reject_blank_api_key() {
    let config = JulesApiConfig::new("   ");
    let error = build_headers(&config, None).expect_err("blank key must fail");
    assert!(matches!(error, JulesApiError::MissingApiKey));
}

#[test]
fn headers_user_agent_prefers_explicit_then_config() {
    let config = JulesApiConfig::new("key").with_user_agent("from-config/1");

    let headers = build_headers(&config, Some("explicit/2")).expect("headers");
    assert_eq!(headers.get(HEADER_USER_AGENT).map(String::as_str), Some("explicit/2"));

    let headers = build_headers(&config, None).expect("headers");
    assert_eq!(
        headers.get(HEADER_USER_AGENT).map(String::as_str),
        Some("from-config/1")
    );
}

#[test]
fn extra_headers_are_lowercased_but_cannot_replace_api_key() {
    let config = JulesApiConfig::new("real-key")
        .insert_header("X-Trace-Id", " t-1 ")
        .insert_header("X-Goog-Api-Key", "spoofed");
    let headers = build_headers(&config, None).expect("headers");

    assert_eq!(headers.get("x-trace-id").map(String::as_str), Some("t-1"));
    assert_eq!(headers.get(HEADER_API_KEY).map(String::as_str), Some("real-key"));
}
