use credential_store::CredentialStore;
use tracing::warn;

/// Where the app goes on launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupRoute {
    /// No usable key is stored; ask for one.
    CredentialEntry,
    Dashboard { api_key: String },
}

/// Routes on the stored key. An unreadable store counts as no key.
pub fn resolve_route(store: &CredentialStore) -> StartupRoute {
    match store.load() {
        Ok(Some(api_key)) => StartupRoute::Dashboard { api_key },
        Ok(None) => StartupRoute::CredentialEntry,
        Err(error) => {
            warn!(%error, path = %store.path().display(), "ignoring unreadable credential store");
            StartupRoute::CredentialEntry
        }
    }
}

/// Like [`resolve_route`], but a non-blank key from the environment wins
/// over the stored one.
pub fn resolve_route_with_override(
    store: &CredentialStore,
    env_api_key: Option<&str>,
) -> StartupRoute {
    match env_api_key.map(str::trim).filter(|key| !key.is_empty()) {
        Some(api_key) => StartupRoute::Dashboard {
            api_key: api_key.to_string(),
        },
        None => resolve_route(store),
    }
}
