use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preferences at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize preferences for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("API key must not be empty")]
    EmptyKey,

    #[error("no configuration directory is available; set JULES_MANAGER_CONFIG_DIR")]
    NoConfigDir,
}

impl CredentialStoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
