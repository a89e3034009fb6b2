use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

impl ListenConfig {
    pub fn tls_files(&self) -> Option<(&str, &str)> {
        match (&self.tlscert, &self.tlskey) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie")]
    pub cookie: String,
    /// Idle seconds before a session and its cart are dropped.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(alias = "sweepinterval", default = "default_sweep_interval")]
    pub sweep_interval: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie: default_cookie(),
            timeout: default_timeout(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

impl SessionConfig {
    pub fn max_idle(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn sweep_every(&self) -> Duration {
        // tokio::time::interval panics on a zero period
        Duration::from_secs(self.sweep_interval.max(1))
    }
}

fn default_port() -> String {
    "8080".to_string()
}

fn default_cookie() -> String {
    "MOVIECART_SESSION".to_string()
}

fn default_timeout() -> u64 {
    30 * 60
}

fn default_sweep_interval() -> u64 {
    60
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(&content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}
