use limits_types::{LimitsError, LimitsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::constants::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use super::logging::LoggingConfig;
use super::types::LogLevel;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub endpoint: String,
    pub admin_secret: Option<String>,
    pub timeout_secs: u64,
    pub logging: LoggingConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            admin_secret: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            logging: LoggingConfig::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".api-limits"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    pub fn load(path: impl AsRef<Path>) -> LimitsResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| LimitsError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| LimitsError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> LimitsResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| LimitsError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LimitsError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| LimitsError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = var("API_LIMITS_ENDPOINT") {
            self.endpoint = endpoint;
        }

        if let Some(secret) = var("API_LIMITS_ADMIN_SECRET") {
            self.admin_secret = Some(secret);
        }

        if let Some(timeout) = var("API_LIMITS_TIMEOUT") {
            match timeout.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid API_LIMITS_TIMEOUT value: {}", timeout),
            }
        }

        if let Some(level) = var("API_LIMITS_LOG_LEVEL") {
            self.logging.level = LogLevel::parse_lossy(&level);
        }

        if var("API_LIMITS_LOG_JSON").is_some() {
            self.logging.json = true;
        }
    }

    pub fn validate(&self) -> LimitsResult<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(LimitsError::Config(format!(
                "Endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }

        if self.timeout_secs == 0 {
            return Err(LimitsError::Config("Request timeout cannot be 0".into()));
        }

        if self.admin_secret.is_none() && !self.endpoint_is_local() {
            warn!("No admin secret configured for remote endpoint {}", self.endpoint);
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoint_is_local(&self) -> bool {
        let host = self
            .endpoint
            .split("://")
            .nth(1)
            .unwrap_or_default();
        host.starts_with("localhost") || host.starts_with("127.0.0.1") || host.starts_with("[::1]")
    }

    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            endpoint: self.endpoint.clone(),
            admin_secret_set: self.admin_secret.is_some(),
            timeout_secs: self.timeout_secs,
            log_level: self.logging.level,
            log_json: self.logging.json,
        }
    }
}

/// Printable view of the configuration without the admin secret.
#[derive(Clone, Debug, Serialize)]
pub struct RedactedConfig {
    pub endpoint: String,
    pub admin_secret_set: bool,
    pub timeout_secs: u64,
    pub log_level: LogLevel,
    pub log_json: bool,
}

impl fmt::Display for RedactedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Endpoint:     {}", self.endpoint)?;
        writeln!(
            f,
            "Admin secret: {}",
            if self.admin_secret_set { "[REDACTED]" } else { "not set" }
        )?;
        writeln!(f, "Timeout:      {}s", self.timeout_secs)?;
        write!(f, "Logging:      {} (json: {})", self.log_level, self.log_json)
    }
}
