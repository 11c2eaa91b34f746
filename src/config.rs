use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "RAWGET_CONFIG";
/// Overrides [`Config::user_agent`].
pub const USER_AGENT_ENV: &str = "RAWGET_USER_AGENT";
/// Overrides [`Config::receive_timeout_secs`].
pub const TIMEOUT_ENV: &str = "RAWGET_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value of the `User-Agent` request header.
    pub user_agent: String,
    /// Upper bound for a single receive call.
    pub receive_timeout_secs: u64,
    /// Upper bound for establishing the TCP connection.
    pub connect_timeout_secs: u64,
    /// Longest status line, header block or chunk-size line accepted.
    pub max_header_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: concat!("rawget/", env!("CARGO_PKG_VERSION")).to_string(),
            receive_timeout_secs: 5,
            connect_timeout_secs: 30,
            max_header_bytes: 64 * 1024,
        }
    }
}

impl Config {
    /// Loads the config file named by `RAWGET_CONFIG` (if any), then applies
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {path}"))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("failed to parse config file {path}"))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
            cfg.user_agent = agent;
        }

        if let Ok(timeout) = std::env::var(TIMEOUT_ENV) {
            cfg.receive_timeout_secs = timeout
                .parse()
                .with_context(|| format!("{TIMEOUT_ENV} must be a number of seconds, got {timeout}"))?;
        }

        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("invalid YAML config")
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_secs(self.receive_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
