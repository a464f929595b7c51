use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::CredentialStoreError;
use crate::paths::{default_store_dir, store_file_path, temp_file_path};
use crate::schema::Preferences;

/// Named local preference store holding the API key.
///
/// The file is created lazily on the first [`CredentialStore::save`]; a
/// missing file simply means no key has been stored yet.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store rooted at `dir`. No I/O happens until a read or write.
    pub fn open(dir: &Path) -> Self {
        Self {
            path: store_file_path(dir),
        }
    }

    /// Store in [`default_store_dir`].
    pub fn open_default() -> Result<Self, CredentialStoreError> {
        let dir = default_store_dir().ok_or(CredentialStoreError::NoConfigDir)?;
        Ok(Self::open(&dir))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Preferences, CredentialStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            Err(error) => {
                return Err(CredentialStoreError::io(
                    "reading preferences",
                    &self.path,
                    error,
                ))
            }
        };

        if raw.trim().is_empty() {
            return Ok(Preferences::default());
        }

        serde_json::from_str(&raw).map_err(|source| CredentialStoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// The stored API key, if any.
    pub fn load(&self) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.read()?.api_key().map(str::to_owned))
    }

    /// Persist `api_key` (trimmed), replacing any previous value.
    pub fn save(&self, api_key: &str) -> Result<(), CredentialStoreError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CredentialStoreError::EmptyKey);
        }

        self.write(&Preferences {
            api_key: Some(api_key.to_owned()),
        })?;
        tracing::info!(path = %self.path.display(), "stored API key");
        Ok(())
    }

    /// Forget the stored key. Clearing an absent store is not an error.
    pub fn clear(&self) -> Result<(), CredentialStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "cleared API key");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CredentialStoreError::io(
                "removing preferences",
                &self.path,
                error,
            )),
        }
    }

    fn write(&self, preferences: &Preferences) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| {
                CredentialStoreError::io("creating preferences directory", parent, source)
            })?;
        }

        let encoded = serde_json::to_vec_pretty(preferences).map_err(|source| {
            CredentialStoreError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let temp_path = temp_file_path(&self.path);
        let mut file = create_private_file(&temp_path)
            .map_err(|source| CredentialStoreError::io("creating temp preferences", &temp_path, source))?;
        file.write_all(&encoded)
            .and_then(|()| file.sync_all())
            .map_err(|source| CredentialStoreError::io("writing temp preferences", &temp_path, source))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .map_err(|source| CredentialStoreError::io("replacing preferences", &self.path, source))
    }
}

#[cfg(unix)]
fn create_private_file(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private_file(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
