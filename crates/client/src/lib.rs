//! Beacon client - batched, best-effort delivery of telemetry events.
//!
//! Callers submit discrete events; the client buffers them in memory and
//! flushes them as bulk HTTP POSTs to a collector, either when the buffer
//! reaches the configured batch size or when a debounced timer fires.
//! Failed batches are retried a bounded number of times, then abandoned.
//! Key principles:
//!
//! - **Fire-and-forget**: `log()` never surfaces delivery failures
//! - **Bounded memory**: the buffer drops its oldest event past 5000 pending
//! - **Best-effort**: at most 3 delivery attempts per batch, then the cycle
//!   is abandoned and the next trigger re-attempts
//! - **Single flush cycle**: triggers that fire mid-cycle are dropped
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   log()     │────▶│ EventBuffer  │────▶│  Dispatcher  │
//! │ (callers)   │     │ (FIFO, 5000) │     │ (flush loop) │
//! └─────────────┘     └──────────────┘     └──────────────┘
//!       │                    ▲                    │
//!       │ Triggers:          │ drain on           │ Sends:
//!       │ - size == min      │ confirmed          │ - bulk JSON POST
//!       │ - debounced timer  │ delivery           │ - ≤ 50 events/batch
//!       ▼                    │                    ▼
//! ┌─────────────┐            │             ┌──────────────┐
//! │  Scheduler  │────────────┘             │  Transport   │
//! │ (one-shot)  │                          │ (reqwest)    │
//! └─────────────┘                          └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use beacon_client::{ConfigPatch, Event};
//!
//! # async fn run() {
//! // Initialize the process-wide client (later calls reconfigure in place)
//! beacon_client::setup(ConfigPatch {
//!     api_key: Some("beacon-prod-key".into()),
//!     receiver_url: Some("https://collect.example.com/api/events/_bulk".into()),
//!     ..Default::default()
//! });
//!
//! let event = Event::builder()
//!     .schema_name("page_view")
//!     .project_name("website")
//!     .payload_json(r#"{"page": "/home"}"#)
//!     .build()
//!     .unwrap();
//!
//! // Fire-and-forget; delivery failures never propagate here
//! let _ = beacon_client::log(event).await;
//! # }
//! ```
//!
//! Embedders that prefer explicit dependency injection can construct a
//! [`Dispatcher`] directly and skip the process-wide registry entirely.

pub mod buffer;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod payload;
pub mod scheduler;
pub mod transport;

pub use config::{Config, ConfigPatch};
pub use dispatcher::{Dispatcher, FlushOutcome};
pub use error::{BeaconError, Result};
pub use event::{Event, EventBuilder};
pub use transport::{HttpTransport, Transport};

use std::sync::OnceLock;

/// Controlled slot for a process-wide dispatcher.
///
/// Construction happens exactly once, on the first `setup` call; later
/// calls merge their patch into the live configuration instead. This is
/// the lifecycle behind the crate-level [`setup`]/[`get`]/[`log`]
/// functions; tests and embedders can hold their own `Registry` instead
/// of sharing the global one.
#[derive(Debug, Default)]
pub struct Registry {
    slot: OnceLock<Dispatcher>,
}

impl Registry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Initialize the dispatcher, or reconfigure it if already initialized.
    ///
    /// The first call builds a dispatcher from defaults plus `patch`;
    /// later calls merge `patch` into the live configuration without
    /// touching buffered events or in-flight flushes.
    pub fn setup(&self, patch: ConfigPatch) -> &Dispatcher {
        let mut patch = Some(patch);
        let dispatcher = self.slot.get_or_init(|| {
            let patch = patch.take().unwrap_or_default();
            Dispatcher::new(Config::from_patch(patch))
        });

        // Lost the init race (or the slot already existed): merge instead
        if let Some(patch) = patch.take() {
            dispatcher.reconfigure(patch);
        }

        dispatcher
    }

    /// Access the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`BeaconError::Uninitialized`] if `setup` was never called.
    pub fn get(&self) -> Result<&Dispatcher> {
        self.slot.get().ok_or(BeaconError::Uninitialized)
    }
}

static GLOBAL: Registry = Registry::new();

/// Initialize or reconfigure the process-wide dispatcher.
///
/// Idempotent: the first call creates the dispatcher from defaults plus
/// `patch`; later calls merge `patch` into the live configuration.
pub fn setup(patch: ConfigPatch) -> &'static Dispatcher {
    GLOBAL.setup(patch)
}

/// Access the process-wide dispatcher.
///
/// # Errors
///
/// Returns [`BeaconError::Uninitialized`] if [`setup`] was never called.
pub fn get() -> Result<&'static Dispatcher> {
    GLOBAL.get()
}

/// Submit one event through the process-wide dispatcher.
///
/// Delivery failures are never surfaced; the only error is
/// [`BeaconError::Uninitialized`].
///
/// # Errors
///
/// Returns [`BeaconError::Uninitialized`] if [`setup`] was never called.
pub async fn log(event: Event) -> Result<()> {
    GLOBAL.get()?.log(event).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_get_before_setup_fails() {
        let registry = Registry::new();
        assert!(matches!(registry.get(), Err(BeaconError::Uninitialized)));
    }

    #[test]
    fn test_setup_initializes_with_defaults_plus_patch() {
        let registry = Registry::new();
        let dispatcher = registry.setup(ConfigPatch {
            api_key: Some("secret".into()),
            ..Default::default()
        });

        let config = dispatcher.config();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.min_batch_size, 10);
        assert_eq!(config.batch_interval, Duration::from_millis(5000));
    }

    #[test]
    fn test_second_setup_merges_partial_config() {
        let registry = Registry::new();
        registry.setup(ConfigPatch {
            api_key: Some("secret".into()),
            receiver_url: Some("https://collect.example.com/bulk".into()),
            min_batch_size: Some(3),
            ..Default::default()
        });

        registry.setup(ConfigPatch {
            batch_interval: Some(Duration::from_millis(10_000)),
            ..Default::default()
        });

        let config = registry.get().unwrap().config();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.receiver_url, "https://collect.example.com/bulk");
        assert_eq!(config.min_batch_size, 3);
        assert_eq!(config.batch_interval, Duration::from_millis(10_000));
    }

    #[test]
    fn test_setup_returns_same_dispatcher() {
        let registry = Registry::new();
        let first = registry.setup(ConfigPatch::default());
        first.reconfigure(ConfigPatch {
            api_key: Some("secret".into()),
            ..Default::default()
        });

        let second = registry.setup(ConfigPatch::default());
        assert_eq!(second.config().api_key, "secret");
    }
}
