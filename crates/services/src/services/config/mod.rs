use std::path::Path;

use thiserror::Error;

mod schema;

pub use schema::{
    BACKEND_PORT_ENV, CURRENT_CONFIG_VERSION, Config, DATABASE_URL_ENV, HOST_ENV, PORT_ENV,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Will always return config, falling back to defaults on missing/invalid files.
pub async fn load_config_from_file(config_path: &Path) -> Config {
    match tokio::fs::read_to_string(config_path).await {
        Ok(raw_config) => Config::from_raw(&raw_config),
        Err(err) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                tracing::info!("No config file found at {}, using defaults", config_path.display());
            } else {
                tracing::warn!("Failed to read config file: {}", err);
            }
            Config::default()
        }
    }
}

/// Saves the config to the given path
pub async fn save_config_to_file(config: &Config, config_path: &Path) -> Result<(), ConfigError> {
    let normalized = config.clone().normalized();
    let raw_config = serde_json::to_string_pretty(&normalized)?;
    tokio::fs::write(config_path, raw_config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from_file(&dir.path().join("config.json")).await;
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn invalid_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_config_from_file(&path).await, Config::default());
    }

    #[tokio::test]
    async fn saved_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            port: 9191,
            database_url: Some("sqlite::memory:".to_string()),
            ..Config::default()
        };

        save_config_to_file(&config, &path).await.unwrap();
        assert_eq!(load_config_from_file(&path).await, config);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config = Config::from_raw(r#"{"port": 3000, "database_url": "  "}"#);
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn env_overrides_file_values() {
        let config = Config::default().with_env_overrides(env(&[
            (HOST_ENV, "0.0.0.0"),
            (PORT_ENV, "4000"),
            (DATABASE_URL_ENV, "sqlite::memory:"),
        ]));
        assert_eq!(config.bind_address(), "0.0.0.0:4000");
        assert_eq!(config.database_url(), "sqlite::memory:");
    }

    #[test]
    fn backend_port_wins_over_port_and_bad_values_are_ignored() {
        let config = Config::default()
            .with_env_overrides(env(&[(BACKEND_PORT_ENV, "5000"), (PORT_ENV, "4000")]));
        assert_eq!(config.port, 5000);

        let config = Config::default().with_env_overrides(env(&[(PORT_ENV, "not-a-port")]));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn default_database_url_points_into_asset_dir() {
        let url = Config::default().database_url();
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("db.sqlite?mode=rwc"));
    }
}
