//! Wire payload types for the bulk ingest endpoint.
//!
//! Each flush batch is posted as a single JSON body:
//!
//! ```json
//! {"events": [{"serializedEvent": "<base64>", "schemaName": "...", "projectName": "..."}]}
//! ```
//!
//! Event payload bytes are base64-encoded; schema and project names ride
//! alongside in clear text so the collector can route without decoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::error::{BeaconError, Result};
use crate::event::Event;

/// JSON body of one bulk POST
#[derive(Debug, Serialize)]
pub struct BulkPayload {
    /// Transport-ready records, in buffer order
    pub events: Vec<EventRecord>,
}

/// One event as it appears on the wire
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Base64-encoded event payload
    pub serialized_event: String,

    /// Schema identifier
    pub schema_name: String,

    /// Project identifier
    pub project_name: String,
}

impl EventRecord {
    /// Encode a single event into its wire record
    pub fn from_event(event: &Event) -> Self {
        Self {
            serialized_event: STANDARD.encode(event.payload()),
            schema_name: event.schema_name().to_string(),
            project_name: event.project_name().to_string(),
        }
    }
}

impl BulkPayload {
    /// Encode a batch of events into a bulk payload, preserving order
    pub fn from_events(events: &[Event]) -> Self {
        Self {
            events: events.iter().map(EventRecord::from_event).collect(),
        }
    }

    /// Serialize to the JSON request body
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| BeaconError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(schema: &str, payload: &[u8]) -> Event {
        Event::builder()
            .schema_name(schema)
            .project_name("website")
            .payload(payload.to_vec())
            .build()
            .unwrap()
    }

    #[test]
    fn test_record_encodes_payload_base64() {
        let record = EventRecord::from_event(&event("click", b"hello"));
        assert_eq!(record.serialized_event, "aGVsbG8=");
        assert_eq!(record.schema_name, "click");
        assert_eq!(record.project_name, "website");
    }

    #[test]
    fn test_bulk_payload_wire_shape() {
        let payload = BulkPayload::from_events(&[event("click", b"hi")]);
        let json = payload.to_json().unwrap();

        assert_eq!(
            json,
            r#"{"events":[{"serializedEvent":"aGk=","schemaName":"click","projectName":"website"}]}"#
        );
    }

    #[test]
    fn test_bulk_payload_preserves_order() {
        let payload =
            BulkPayload::from_events(&[event("first", b"1"), event("second", b"2")]);
        assert_eq!(payload.events[0].schema_name, "first");
        assert_eq!(payload.events[1].schema_name, "second");
    }

    #[test]
    fn test_empty_payload_still_serializes() {
        let payload = BulkPayload::from_events(&[]);
        assert_eq!(payload.to_json().unwrap(), r#"{"events":[]}"#);
    }
}
