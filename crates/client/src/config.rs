//! Client configuration.
//!
//! A resolved [`Config`] holds the live settings of a dispatcher; a
//! [`ConfigPatch`] is a partial update merged into it. Merging follows
//! partial-update semantics: only fields that are present and non-empty /
//! non-zero override the existing values, so a patch that sets one field
//! leaves the rest untouched.
//!
//! # Defaults
//!
//! - `receiver_url`: `http://localhost:8081/api/events/_bulk`
//! - `batch_interval`: 5 seconds
//! - `min_batch_size`: 10
//! - `debug_log`: false
//!
//! Batch sizing and retry bounds are operational constants, not
//! configuration: [`MAX_BULK_SIZE`], [`MAX_ATTEMPTS`], [`MAX_UNSENT_EVENTS`].

use serde::Deserialize;
use std::time::Duration;

/// Default bulk ingest endpoint
pub const DEFAULT_RECEIVER_URL: &str = "http://localhost:8081/api/events/_bulk";

/// Maximum events per bulk request
pub const MAX_BULK_SIZE: usize = 50;

/// Delivery attempts per batch before the flush cycle is abandoned
pub const MAX_ATTEMPTS: u32 = 3;

/// Maximum buffered events; older events are dropped beyond this bound
pub const MAX_UNSENT_EVENTS: usize = 5000;

/// Resolved dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Credential token attached to every bulk request (`X-Auth-Token`)
    pub api_key: String,

    /// Bulk ingest endpoint URL
    pub receiver_url: String,

    /// Debounce window for timer-scheduled flushes
    pub batch_interval: Duration,

    /// Buffer length that triggers an immediate flush (exact match)
    pub min_batch_size: usize,

    /// Emit debug-level lifecycle tracing
    pub debug_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            receiver_url: DEFAULT_RECEIVER_URL.to_string(),
            batch_interval: Duration::from_millis(5000),
            min_batch_size: 10,
            debug_log: false,
        }
    }
}

impl Config {
    /// Merge a partial update into this configuration.
    ///
    /// Only present, non-empty / non-zero fields override; everything else
    /// keeps its prior value. Event state and in-flight flushes are not
    /// affected by reconfiguration.
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(api_key) = patch.api_key {
            if !api_key.is_empty() {
                self.api_key = api_key;
            }
        }
        if let Some(receiver_url) = patch.receiver_url {
            if !receiver_url.is_empty() {
                self.receiver_url = receiver_url;
            }
        }
        if let Some(batch_interval) = patch.batch_interval {
            if !batch_interval.is_zero() {
                self.batch_interval = batch_interval;
            }
        }
        if let Some(min_batch_size) = patch.min_batch_size {
            if min_batch_size > 0 {
                self.min_batch_size = min_batch_size;
            }
        }
        if let Some(debug_log) = patch.debug_log {
            self.debug_log = debug_log;
        }
    }

    /// Defaults with a patch applied, for first-time setup
    #[must_use]
    pub fn from_patch(patch: ConfigPatch) -> Self {
        let mut config = Self::default();
        config.apply(patch);
        config
    }
}

/// Partial configuration update
///
/// # Example
///
/// ```toml
/// api_key = "beacon-prod-key"
/// receiver_url = "https://collect.example.com/api/events/_bulk"
/// batch_interval = "10s"
/// min_batch_size = 25
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    /// Credential token for the collector
    pub api_key: Option<String>,

    /// Bulk ingest endpoint URL
    pub receiver_url: Option<String>,

    /// Debounce window (humantime strings: "5s", "500ms", ...)
    #[serde(with = "humantime_serde::option")]
    pub batch_interval: Option<Duration>,

    /// Immediate-flush trigger size
    pub min_batch_size: Option<usize>,

    /// Emit debug-level lifecycle tracing
    pub debug_log: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.receiver_url, DEFAULT_RECEIVER_URL);
        assert_eq!(config.batch_interval, Duration::from_millis(5000));
        assert_eq!(config.min_batch_size, 10);
        assert!(!config.debug_log);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_apply_partial_patch_preserves_other_fields() {
        let mut config = Config::default();
        config.apply(ConfigPatch {
            api_key: Some("secret".into()),
            receiver_url: Some("https://collect.example.com/bulk".into()),
            min_batch_size: Some(3),
            ..Default::default()
        });

        // Second patch only changes the interval
        config.apply(ConfigPatch {
            batch_interval: Some(Duration::from_millis(10_000)),
            ..Default::default()
        });

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.receiver_url, "https://collect.example.com/bulk");
        assert_eq!(config.min_batch_size, 3);
        assert_eq!(config.batch_interval, Duration::from_millis(10_000));
    }

    #[test]
    fn test_apply_ignores_empty_and_zero_fields() {
        let mut config = Config::from_patch(ConfigPatch {
            api_key: Some("secret".into()),
            ..Default::default()
        });

        config.apply(ConfigPatch {
            api_key: Some(String::new()),
            receiver_url: Some(String::new()),
            batch_interval: Some(Duration::ZERO),
            min_batch_size: Some(0),
            ..Default::default()
        });

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.receiver_url, DEFAULT_RECEIVER_URL);
        assert_eq!(config.batch_interval, Duration::from_millis(5000));
        assert_eq!(config.min_batch_size, 10);
    }

    #[test]
    fn test_deserialize_empty() {
        let patch: ConfigPatch = toml::from_str("").unwrap();
        assert!(patch.api_key.is_none());
        assert!(patch.batch_interval.is_none());
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
api_key = "beacon-prod-key"
receiver_url = "https://collect.example.com/api/events/_bulk"
batch_interval = "10s"
min_batch_size = 25
debug_log = true
"#;
        let patch: ConfigPatch = toml::from_str(toml).unwrap();
        assert_eq!(patch.batch_interval, Some(Duration::from_secs(10)));
        assert_eq!(patch.min_batch_size, Some(25));
        assert_eq!(patch.debug_log, Some(true));

        let config = Config::from_patch(patch);
        assert_eq!(config.api_key, "beacon-prod-key");
    }
}
