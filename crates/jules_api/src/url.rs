/// Default base URL for Jules API requests.
pub const DEFAULT_JULES_BASE_URL: &str = "https://jules.googleapis.com";
/// Versioned path prefix every resource path lives under.
pub const DEFAULT_API_VERSION: &str = "v1alpha";

/// Normalize a base URL: blank input falls back to the default endpoint and
/// trailing slashes are dropped.
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_JULES_BASE_URL
    } else {
        input.trim()
    };

    base.trim_end_matches('/').to_string()
}

/// Join a base URL, version prefix and resource path.
///
/// The resource path is inserted verbatim. Session names are path-shaped
/// (`sessions/123`) and must keep their slashes, so no percent-encoding is
/// applied here.
pub fn resource_url(base_url: &str, api_version: &str, resource_path: &str) -> String {
    let base = normalize_base_url(base_url);
    let version = api_version.trim().trim_matches('/');
    let path = resource_path.trim().trim_start_matches('/');

    if version.is_empty() {
        format!("{base}/{path}")
    } else {
        format!("{base}/{version}/{path}")
    }
}
