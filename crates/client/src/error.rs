//! Error types for the beacon client.
//!
//! Provides structured errors for event building, delivery, and lifecycle
//! failures. Delivery errors never reach `log()` callers; they only drive
//! the retry policy inside a flush cycle.

use thiserror::Error;

/// Result type for beacon client operations
pub type Result<T> = std::result::Result<T, BeaconError>;

/// Errors that can occur in the beacon client
#[derive(Debug, Error)]
pub enum BeaconError {
    // =========================================================================
    // Lifecycle errors
    // =========================================================================
    /// The process-wide client was accessed before `setup()` was called
    #[error("beacon client is not initialized, call setup() first")]
    Uninitialized,

    // =========================================================================
    // Event building errors
    // =========================================================================
    /// A required event field is missing
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A name field exceeds the maximum length
    #[error("{field} too long: {len} bytes exceeds maximum {max} bytes")]
    NameTooLong {
        /// Field name (schema_name, project_name)
        field: &'static str,
        /// Actual length provided
        len: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Event payload exceeds the maximum size
    #[error("payload too large: {size} bytes exceeds maximum {max} bytes")]
    PayloadTooLarge {
        /// Actual size provided
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    // =========================================================================
    // Delivery errors
    // =========================================================================
    /// Network error during batch delivery
    #[error("network error: {0}")]
    Network(String),

    /// Collector returned an error status
    #[error("server error: HTTP {0}")]
    Server(u16),

    /// Failed to serialize the bulk payload
    #[error("serialization error: {0}")]
    Serialization(String),
}
