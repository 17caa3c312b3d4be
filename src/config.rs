//! Remote service configuration
//!
//! The backend location is the only environment dependency. Defaults point at
//! the hosted Takhrij service; both values can be overridden through
//! environment variables.

use crate::error::TakhrijError;
use std::time::Duration;

/// Hosted backend
const DEFAULT_BASE_URL: &str = "https://takhrij-backend.onrender.com";
const SEARCH_PATH: &str = "search-hadith";
const COMMENTARY_PATH: &str = "gpt-commentary";

pub const BASE_URL_ENV: &str = "TAKHRIJ_BASE_URL";
pub const TIMEOUT_ENV: &str = "TAKHRIJ_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub search_path: String,
    pub commentary_path: String,
    /// No deadline when unset; a hung call then stays `Loading`.
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: SEARCH_PATH.to_string(),
            commentary_path: COMMENTARY_PATH.to_string(),
            request_timeout: None,
        }
    }
}

impl ServiceConfig {
    /// Config with the default paths against another host
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load config from `TAKHRIJ_BASE_URL` / `TAKHRIJ_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, TakhrijError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, TakhrijError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_ENV) {
            if url.trim().is_empty() {
                return Err(TakhrijError::Config(format!("{} is blank", BASE_URL_ENV)));
            }
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                TakhrijError::Config(format!("{} must be a whole number of seconds, got {:?}", TIMEOUT_ENV, raw))
            })?;
            if secs == 0 {
                return Err(TakhrijError::Config(format!("{} must be greater than zero", TIMEOUT_ENV)));
            }
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn search_url(&self) -> String {
        self.endpoint(&self.search_path)
    }

    pub fn commentary_url(&self) -> String {
        self.endpoint(&self.commentary_path)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
