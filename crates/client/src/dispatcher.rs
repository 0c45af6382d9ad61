//! Batching dispatcher - accumulates events and flushes them in bulk.
//!
//! The dispatcher owns the event buffer and decides when to flush it:
//! either when the buffer lands exactly on the configured batch size
//! (immediate, awaited by the caller) or when a debounced one-shot timer
//! fires (deferred, never blocks a caller). A flush cycle drains the
//! buffer in batches of up to [`MAX_BULK_SIZE`] events, retrying each
//! batch up to [`MAX_ATTEMPTS`] times before abandoning the cycle with
//! the batch left in place.
//!
//! At most one flush cycle runs at a time process-wide. A trigger that
//! fires mid-cycle is dropped, not queued; the next submission's trigger
//! re-attempts whatever is still buffered. Delivery failures never reach
//! `log()` callers - submission is fire-and-forget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error};

use crate::buffer::EventBuffer;
use crate::config::{Config, ConfigPatch, MAX_ATTEMPTS, MAX_BULK_SIZE};
use crate::event::Event;
use crate::payload::BulkPayload;
use crate::scheduler::FlushScheduler;
use crate::transport::{HttpTransport, Transport};

/// Result of one flush trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The buffer was drained to empty (or was already empty)
    Completed,
    /// Another flush cycle was running; this trigger was dropped
    Skipped,
    /// A batch exhausted its delivery attempts; the cycle was abandoned
    /// with the batch (and everything after it) still buffered
    Abandoned,
}

/// Handle to the batching dispatcher.
///
/// Cheap to clone; all clones share the same buffer, configuration, and
/// flush state.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending_events", &self.inner.buffer.lock().len())
            .field("sending", &self.inner.sending.load(Ordering::Relaxed))
            .field("transport", &self.inner.transport.name())
            .finish()
    }
}

struct Inner {
    config: Mutex<Config>,
    buffer: Mutex<EventBuffer>,
    scheduler: FlushScheduler,
    /// Mutual-exclusion flag: true for the whole duration of one flush cycle
    sending: AtomicBool,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    /// Create a dispatcher delivering over HTTP
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a dispatcher with a custom transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: Mutex::new(config),
                buffer: Mutex::new(EventBuffer::new()),
                scheduler: FlushScheduler::new(),
                sending: AtomicBool::new(false),
                transport,
            }),
        }
    }

    /// Submit one event.
    ///
    /// The event is appended to the buffer (dropping the oldest buffered
    /// event on overflow) and a flush is scheduled: if the buffer length
    /// lands exactly on `min_batch_size` the flush runs inline and this
    /// call waits for the whole cycle, retries included; otherwise a
    /// debounced one-shot timer covers it. Delivery failures are not
    /// surfaced here.
    ///
    /// The size trigger is an exact match, not a threshold: a buffer that
    /// skips over `min_batch_size` (e.g. after an abandoned cycle) waits
    /// for the timer instead.
    pub async fn log(&self, event: Event) {
        let (buffered, min_batch_size, batch_interval, debug_log) = {
            let config = self.inner.config.lock();
            let mut buffer = self.inner.buffer.lock();
            buffer.append(event);
            (
                buffer.len(),
                config.min_batch_size,
                config.batch_interval,
                config.debug_log,
            )
        };

        if debug_log {
            debug!(buffered, "event queued");
        }

        if self.inner.scheduler.should_arm(batch_interval) {
            if debug_log {
                debug!(
                    delay_ms = batch_interval.as_millis() as u64,
                    "flush timer armed"
                );
            }
            let dispatcher = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(batch_interval).await;
                dispatcher.flush().await;
            });
        }

        if buffered == min_batch_size {
            if debug_log {
                debug!(buffered, "batch size reached, flushing");
            }
            self.flush().await;
        }
    }

    /// Run one flush cycle, draining the buffer in batches.
    ///
    /// Skips (without queueing) if a cycle is already running. Each batch
    /// gets up to [`MAX_ATTEMPTS`] sequential delivery attempts; if all
    /// fail the cycle is abandoned and the batch stays buffered for the
    /// next trigger.
    pub async fn flush(&self) -> FlushOutcome {
        if self
            .inner
            .sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            if self.inner.config.lock().debug_log {
                debug!("flush already in progress, skipping");
            }
            return FlushOutcome::Skipped;
        }

        let outcome = self.run_cycle().await;
        self.inner.sending.store(false, Ordering::Release);
        outcome
    }

    async fn run_cycle(&self) -> FlushOutcome {
        loop {
            let (batch, receiver_url, api_key, debug_log) = {
                let config = self.inner.config.lock();
                let buffer = self.inner.buffer.lock();
                (
                    buffer.take_batch(MAX_BULK_SIZE),
                    config.receiver_url.clone(),
                    config.api_key.clone(),
                    config.debug_log,
                )
            };

            if batch.is_empty() {
                if debug_log {
                    debug!("flush cycle complete, buffer empty");
                }
                return FlushOutcome::Completed;
            }

            let body = match BulkPayload::from_events(&batch).to_json() {
                Ok(body) => body,
                Err(e) => {
                    error!(error = %e, "failed to serialize batch, abandoning flush cycle");
                    return FlushOutcome::Abandoned;
                }
            };

            let mut delivered = false;
            for attempt in 1..=MAX_ATTEMPTS {
                match self
                    .inner
                    .transport
                    .post(&receiver_url, body.clone(), &api_key)
                    .await
                {
                    Ok(()) => {
                        if debug_log {
                            debug!(
                                events = batch.len(),
                                attempt,
                                transport = self.inner.transport.name(),
                                "batch delivered"
                            );
                        }
                        delivered = true;
                        break;
                    }
                    Err(e) => {
                        if debug_log {
                            debug!(attempt, error = %e, "batch delivery failed");
                        }
                    }
                }
            }

            if !delivered {
                if debug_log {
                    debug!(
                        events = batch.len(),
                        attempts = MAX_ATTEMPTS,
                        "delivery attempts exhausted, abandoning flush cycle"
                    );
                }
                return FlushOutcome::Abandoned;
            }

            self.inner.buffer.lock().drain(batch.len());
        }
    }

    /// Merge a partial configuration update into the live configuration.
    ///
    /// Buffered events, in-flight flushes, and already-armed timers are
    /// not affected.
    pub fn reconfigure(&self, patch: ConfigPatch) {
        self.inner.config.lock().apply(patch);
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Config {
        self.inner.config.lock().clone()
    }

    /// Number of events awaiting delivery
    pub fn pending_events(&self) -> usize {
        self.inner.buffer.lock().len()
    }
}
