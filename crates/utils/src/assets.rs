use std::path::PathBuf;

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
pub const ASSET_DIR_ENV: &str = "TODO_ASSET_DIR";

/// Directory holding the sqlite database and `config.json`.
///
/// `TODO_ASSET_DIR` wins when set; debug builds fall back to `dev_assets/` at the
/// workspace root, release builds to the platform data directory.
pub fn asset_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var(ASSET_DIR_ENV) {
        let override_dir = override_dir.trim();
        if !override_dir.is_empty() {
            return PathBuf::from(override_dir);
        }
    }

    if cfg!(debug_assertions) {
        PathBuf::from(PROJECT_ROOT).join("../../dev_assets")
    } else {
        ProjectDirs::from("dev", "todolist", "todo-list")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                tracing::warn!("No home directory found, storing assets in the working directory");
                PathBuf::from(".")
            })
    }
}

pub fn config_path() -> PathBuf {
    asset_dir().join("config.json")
}

pub fn database_path() -> PathBuf {
    asset_dir().join("db.sqlite")
}
