//! Event type and builder.
//!
//! An [`Event`] is opaque to the dispatcher: it carries a schema name, a
//! project name, and a serialized payload. The dispatcher only counts,
//! batches, and serializes events; it never interprets the payload bytes.

use crate::error::{BeaconError, Result};

/// Maximum payload size (1 MB)
const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Maximum schema/project name length
const MAX_NAME_LENGTH: usize = 256;

/// A single telemetry event, immutable once built.
#[derive(Debug, Clone)]
pub struct Event {
    schema_name: String,
    project_name: String,
    payload: Vec<u8>,
}

impl Event {
    /// Start building a new event
    #[inline]
    #[must_use]
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Schema identifier this event conforms to
    #[inline]
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Project the event belongs to
    #[inline]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Serialized event payload
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Builder for constructing a single [`Event`]
///
/// # Example
///
/// ```
/// use beacon_client::Event;
///
/// let event = Event::builder()
///     .schema_name("page_view")
///     .project_name("website")
///     .payload_json(r#"{"page": "/home"}"#)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventBuilder {
    schema_name: Option<String>,
    project_name: Option<String>,
    payload: Option<Vec<u8>>,
}

impl EventBuilder {
    /// Create a new event builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema name
    #[inline]
    #[must_use]
    pub fn schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = Some(name.into());
        self
    }

    /// Set the project name
    #[inline]
    #[must_use]
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Set the payload from raw bytes
    #[inline]
    #[must_use]
    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Convenience: set the payload from a JSON string
    #[inline]
    #[must_use]
    pub fn payload_json(self, json: &str) -> Self {
        self.payload(json.as_bytes().to_vec())
    }

    /// Build the event, validating all fields
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or empty, a name
    /// exceeds 256 bytes, or the payload exceeds 1 MB.
    pub fn build(self) -> Result<Event> {
        let schema_name = match self.schema_name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BeaconError::MissingField("schema_name")),
        };
        if schema_name.len() > MAX_NAME_LENGTH {
            return Err(BeaconError::NameTooLong {
                field: "schema_name",
                len: schema_name.len(),
                max: MAX_NAME_LENGTH,
            });
        }

        let project_name = match self.project_name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BeaconError::MissingField("project_name")),
        };
        if project_name.len() > MAX_NAME_LENGTH {
            return Err(BeaconError::NameTooLong {
                field: "project_name",
                len: project_name.len(),
                max: MAX_NAME_LENGTH,
            });
        }

        let payload = self.payload.unwrap_or_default();
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(BeaconError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Event {
            schema_name,
            project_name,
            payload,
        })
    }
}
