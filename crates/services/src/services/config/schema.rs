use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::assets::database_path;

pub const CURRENT_CONFIG_VERSION: &str = "v1";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const BACKEND_PORT_ENV: &str = "BACKEND_PORT";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Config {
    pub config_version: String,
    pub host: String,
    pub port: u16,
    /// Falls back to `db.sqlite` in the asset directory.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_raw(raw_config: &str) -> Self {
        match serde_json::from_str::<Config>(raw_config) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config (line {}, column {}): {}, using default",
                    e.line(),
                    e.column(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.config_version = CURRENT_CONFIG_VERSION.to_string();

        if self.host.trim().is_empty() {
            tracing::warn!("Empty host in config, resetting to default");
            self.host = default_host();
        } else {
            self.host = self.host.trim().to_string();
        }

        if matches!(self.database_url.as_deref(), Some(url) if url.trim().is_empty()) {
            self.database_url = None;
        }

        self
    }

    /// Applies `HOST`, `BACKEND_PORT`/`PORT` and `DATABASE_URL` on top of the file values.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }

        let port = lookup(BACKEND_PORT_ENV).or_else(|| lookup(PORT_ENV));
        if let Some(raw) = port {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid port '{}'", raw),
            }
        }

        if let Some(database_url) = lookup(DATABASE_URL_ENV) {
            self.database_url = Some(database_url);
        }

        self.normalized()
    }

    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", database_path().to_string_lossy()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION.to_string(),
            host: default_host(),
            port: default_port(),
            database_url: None,
        }
    }
}
