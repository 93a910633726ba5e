//! Collaborator address configuration.
//!
//! Resolution order, first non-blank value wins:
//! 1. explicit override (CLI `--base-url`)
//! 2. `MOHAZO_API_BASE_URL`
//! 3. stored config file `{"api_base_url": "...", "timeout_secs": N}`
//! 4. built-in default `http://localhost:8080`, unless disabled
//!
//! Nothing resolved is a [`DashboardError::Config`]; there is no silent fallback
//! once the default is disabled.

use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::domain::DashboardError;

pub const BASE_URL_ENV: &str = "MOHAZO_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "MOHAZO_API_TIMEOUT_SECS";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, DashboardError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{base}{path}` with a single slash between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Shape of the stored config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| DashboardError::Config(format!("invalid config {}: {e}", path.display())))
    }
}

/// Raw inputs to [`ConfigSources::resolve`].
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub override_base_url: Option<String>,
    pub env_base_url: Option<String>,
    pub env_timeout_secs: Option<String>,
    pub stored: Option<StoredConfig>,
    pub use_default: bool,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            override_base_url: None,
            env_base_url: None,
            env_timeout_secs: None,
            stored: None,
            use_default: true,
        }
    }
}

impl ConfigSources {
    /// Reads the process environment and, if given, the stored config file.
    pub fn from_env(config_path: Option<&Path>) -> Result<Self, DashboardError> {
        let stored = config_path.map(StoredConfig::load).transpose()?;
        Ok(Self {
            env_base_url: std::env::var(BASE_URL_ENV).ok(),
            env_timeout_secs: std::env::var(TIMEOUT_ENV).ok(),
            stored,
            ..Self::default()
        })
    }

    pub fn with_override(mut self, base_url: Option<String>) -> Self {
        self.override_base_url = base_url;
        self
    }

    pub fn without_default(mut self) -> Self {
        self.use_default = false;
        self
    }

    pub fn resolve(self) -> Result<ApiConfig, DashboardError> {
        let stored = self.stored.unwrap_or_default();
        let base_url = [
            self.override_base_url,
            self.env_base_url,
            stored.api_base_url,
        ]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .or_else(|| self.use_default.then(|| DEFAULT_BASE_URL.to_string()))
        .ok_or_else(|| {
            DashboardError::Config(format!(
                "no API base URL configured (set {BASE_URL_ENV} or api_base_url)"
            ))
        })?;

        let timeout = match non_blank(self.env_timeout_secs) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    DashboardError::Config(format!("{TIMEOUT_ENV} must be a number of seconds, got `{raw}`"))
                })?;
                Duration::from_secs(secs)
            }
            None => stored
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        Ok(ApiConfig {
            base_url: parse_base_url(&base_url)?,
            timeout,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, DashboardError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DashboardError::Config(format!("invalid API base URL `{raw}`: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DashboardError::Config(format!(
            "API base URL must be http or https, got `{raw}`"
        )));
    }
    Ok(url)
}
