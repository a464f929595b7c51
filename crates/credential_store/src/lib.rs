mod error;
mod paths;
mod schema;
mod store;

pub use error::CredentialStoreError;
pub use paths::{default_store_dir, store_file_path, CONFIG_DIR_ENV_VAR, STORE_FILE_NAME};
pub use schema::Preferences;
pub use store::CredentialStore;
