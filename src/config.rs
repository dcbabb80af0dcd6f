use crate::error::{CivicError, Result};
use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://civicdb.org/api";

/// Environment variable overriding [`ClientConfig::api_url`].
pub const API_URL_ENV: &str = "CIVIC_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: Url,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout_secs: 30,
            user_agent: concat!("civic-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a TOML config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read client config from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(ClientConfig::default());
        }
        let content = read_to_string(path)?;
        ClientConfig::from_toml_str(&content)
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_api_url_override(std::env::var(API_URL_ENV).ok().as_deref())
    }

    fn with_api_url_override(mut self, api_url: Option<&str>) -> Result<Self> {
        if let Some(raw) = api_url.filter(|s| !s.trim().is_empty()) {
            self.api_url = Url::parse(raw.trim())
                .map_err(|e| CivicError::Config(format!("{API_URL_ENV}={raw}: {e}")))?;
        }
        Ok(self)
    }
}
