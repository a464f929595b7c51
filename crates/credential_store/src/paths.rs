use std::path::{Path, PathBuf};

/// Overrides the directory the preference file lives in.
pub const CONFIG_DIR_ENV_VAR: &str = "JULES_MANAGER_CONFIG_DIR";
pub const APP_DIR_NAME: &str = "jules-manager";
pub const STORE_FILE_NAME: &str = "jules_prefs.json";

/// `$JULES_MANAGER_CONFIG_DIR`, else `<platform config dir>/jules-manager`.
///
/// Returns `None` only when neither is available (no home directory).
#[must_use]
pub fn default_store_dir() -> Option<PathBuf> {
    let from_env = std::env::var_os(CONFIG_DIR_ENV_VAR)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty());

    from_env.or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME)))
}

#[must_use]
pub fn store_file_path(dir: &Path) -> PathBuf {
    dir.join(STORE_FILE_NAME)
}

#[must_use]
pub(crate) fn temp_file_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
