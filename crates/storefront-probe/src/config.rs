//! Session configuration.
//!
//! Resolution order: built-in defaults, then a YAML document if one is given,
//! then `STOREFRONT_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::result::{ProbeError, ProbeResult};
use crate::wait::{WaitOptions, DEFAULT_LOAD_TIMEOUT_MS};

/// Public demo storefront
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "STOREFRONT_BASE_URL";
/// Environment variable overriding the element timeout (ms)
pub const ENV_TIMEOUT_MS: &str = "STOREFRONT_TIMEOUT_MS";
/// Environment variable overriding the poll interval (ms)
pub const ENV_POLL_MS: &str = "STOREFRONT_POLL_MS";

/// Settings shared by every page object of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Storefront origin, without a trailing slash
    pub base_url: String,
    /// Budget for element waits
    pub wait: WaitOptions,
    /// Budget for page readiness
    pub load_wait: WaitOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: WaitOptions::default(),
            load_wait: WaitOptions::default().with_timeout(DEFAULT_LOAD_TIMEOUT_MS),
        }
    }
}

impl SessionConfig {
    /// Defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storefront origin
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the element wait budget
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set the page readiness budget
    #[must_use]
    pub const fn with_load_wait(mut self, load_wait: WaitOptions) -> Self {
        self.load_wait = load_wait;
        self
    }

    /// Absolute URL for a path on the storefront
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Parse from YAML and validate. Absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or invalid values.
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        let mut config: Self = serde_yaml_ng::from_str(yaml)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Defaults with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] when an override is not a valid value.
    pub fn from_env() -> ProbeResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `STOREFRONT_*` overrides read through `lookup`, then validate.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] when an override is not a valid value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ProbeResult<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self = self.with_base_url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.wait.timeout_ms = parse_ms(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_POLL_MS) {
            let poll = parse_ms(ENV_POLL_MS, &raw)?;
            self.wait.poll_interval_ms = poll;
            self.load_wait.poll_interval_ms = poll;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] describing the first invalid value.
    pub fn validate(&self) -> ProbeResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(config_error(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        for (name, wait) in [("wait", &self.wait), ("load_wait", &self.load_wait)] {
            if wait.poll_interval_ms == 0 {
                return Err(config_error(format!("{name}.poll_interval_ms must be positive")));
            }
            if wait.poll_interval_ms > wait.timeout_ms {
                return Err(config_error(format!(
                    "{name}.poll_interval_ms ({}) exceeds timeout_ms ({})",
                    wait.poll_interval_ms, wait.timeout_ms
                )));
            }
        }
        Ok(())
    }
}

fn parse_ms(key: &str, raw: &str) -> ProbeResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| config_error(format!("{key} must be a whole number of milliseconds, got {raw:?}")))
}

fn config_error(message: String) -> ProbeError {
    ProbeError::Config { message }
}
