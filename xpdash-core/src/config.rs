use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::XpdashError;

pub const DEFAULT_AUTH_URL: &str = "https://learn.reboot01.com/api/auth/signin";
pub const DEFAULT_GRAPHQL_URL: &str = "https://learn.reboot01.com/api/graphql-engine/v1/graphql";
pub const DEFAULT_SESSION_PATH: &str = "~/.xpdash/session";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct XpdashConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    pub auth_url: String,
    pub graphql_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Token file location; `~` is expanded.
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_SESSION_PATH.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).into_owned())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl XpdashConfig {
    /// Load from an optional TOML file, then `XPDASH_*` environment overrides
    /// (`XPDASH_ENDPOINTS__AUTH_URL`, `XPDASH_HTTP__TIMEOUT_SECONDS`, ...).
    pub fn load(path: &str) -> Result<Self, XpdashError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("XPDASH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(s.try_deserialize()?)
    }
}
