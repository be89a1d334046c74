//! Controller configuration with page-supplied overrides.
//!
//! Defaults reproduce the dashboard's fixed timings and routes. A page may
//! override any subset through a JSON block:
//!
//! ```html
//! <script type="application/json" id="hub-config">{ "flash_ttl_ms": 8000 }</script>
//! ```
//!
//! Missing fields keep their defaults. An invalid block is rejected as a whole.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use serde::Deserialize;

use crate::error::UiError;
use crate::state::lazy::LazyFallback;

pub const CONFIG_ELEMENT_ID: &str = "hub-config";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_SEARCH_MIN_CHARS: usize = 2;
pub const DEFAULT_FLASH_TTL_MS: u64 = 5000;
pub const DEFAULT_GRID_MIN_TRACK_PX: u32 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Quiet period before a typed query is dispatched.
    pub search_debounce_ms: u64,
    /// Minimum trimmed length for automatic dispatch (Enter ignores it).
    pub search_min_chars: usize,
    pub search_path: String,
    pub search_param: String,
    pub upload_path: String,
    /// Lifetime of a flash message that nobody dismisses.
    pub flash_ttl_ms: u64,
    /// Minimum column width for the grid layout.
    pub grid_min_track_px: u32,
    /// Update worker script, registered when the browser supports it.
    pub worker_script: String,
    pub lazy_fallback: LazyFallback,
    /// Base path for like/download calls; `None` keeps the placeholder service.
    pub notebook_api_base: Option<String>,
    pub log_level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            search_min_chars: DEFAULT_SEARCH_MIN_CHARS,
            search_path: "/search".to_owned(),
            search_param: "q".to_owned(),
            upload_path: "/upload".to_owned(),
            flash_ttl_ms: DEFAULT_FLASH_TTL_MS,
            grid_min_track_px: DEFAULT_GRID_MIN_TRACK_PX,
            worker_script: "/sw.js".to_owned(),
            lazy_fallback: LazyFallback::Inert,
            notebook_api_base: None,
            log_level: "info".to_owned(),
        }
    }
}

impl UiConfig {
    /// Parse and validate a JSON override block.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings for a page whose config block text is `raw`. A rejected block
    /// yields the defaults together with the reason it was rejected.
    pub fn from_page(raw: Option<&str>) -> (Self, Option<UiError>) {
        match raw.map(Self::from_json) {
            None => (Self::default(), None),
            Some(Ok(config)) => (config, None),
            Some(Err(err)) => (Self::default(), Some(err.into())),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_min_chars == 0 {
            return Err(invalid("search_min_chars", "must be at least 1"));
        }
        if self.search_debounce_ms == 0 {
            return Err(invalid("search_debounce_ms", "must be greater than zero"));
        }
        if self.flash_ttl_ms == 0 {
            return Err(invalid("flash_ttl_ms", "must be greater than zero"));
        }
        if self.grid_min_track_px == 0 {
            return Err(invalid("grid_min_track_px", "must be greater than zero"));
        }
        if self.search_param.is_empty() {
            return Err(invalid("search_param", "must not be empty"));
        }
        for (field, path) in [
            ("search_path", self.search_path.as_str()),
            ("upload_path", self.upload_path.as_str()),
            ("worker_script", self.worker_script.as_str()),
        ] {
            if !path.starts_with('/') {
                return Err(invalid(field, "must start with '/'"));
            }
        }
        if let Some(base) = &self.notebook_api_base {
            if !base.starts_with('/') {
                return Err(invalid("notebook_api_base", "must start with '/'"));
            }
        }
        if self.log_level.parse::<log::Level>().is_err() {
            return Err(invalid("log_level", "must be one of error, warn, info, debug, trace"));
        }
        Ok(())
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub fn flash_ttl(&self) -> Duration {
        Duration::from_millis(self.flash_ttl_ms)
    }

    #[must_use]
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
