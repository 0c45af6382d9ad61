//! Bounded FIFO buffer for unsent events.
//!
//! Holds events from submission until confirmed delivery. The buffer is
//! capped at [`MAX_UNSENT_EVENTS`]; when an append exceeds the cap the
//! oldest event is dropped (lossy backpressure, never an error). Batches
//! are taken as read-only prefix snapshots and drained only after the
//! collector has confirmed delivery.

use std::collections::VecDeque;

use tracing::error;

use crate::config::MAX_UNSENT_EVENTS;
use crate::event::Event;

/// FIFO queue of pending events, bounded at [`MAX_UNSENT_EVENTS`]
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: VecDeque<Event>,
}

impl EventBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the tail, dropping the oldest event if the
    /// buffer bound is exceeded.
    pub fn append(&mut self, event: Event) {
        self.events.push_back(event);
        if self.events.len() > MAX_UNSENT_EVENTS {
            self.events.pop_front();
            error!(
                limit = MAX_UNSENT_EVENTS,
                "unsent event limit reached, dropping oldest event"
            );
        }
    }

    /// Snapshot the first `min(len, max)` events without removing them
    pub fn take_batch(&self, max: usize) -> Vec<Event> {
        self.events.iter().take(max).cloned().collect()
    }

    /// Remove the first `count` events after confirmed delivery
    pub fn drain(&mut self, count: usize) {
        let count = count.min(self.events.len());
        self.events.drain(..count);
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the buffer holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    fn event(n: usize) -> Event {
        Event::builder()
            .schema_name("test_event")
            .project_name("test_project")
            .payload(n.to_string().into_bytes())
            .build()
            .unwrap()
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut buffer = EventBuffer::new();
        for n in 0..5 {
            buffer.append(event(n));
        }

        let batch = buffer.take_batch(10);
        assert_eq!(batch.len(), 5);
        for (n, event) in batch.iter().enumerate() {
            assert_eq!(event.payload(), n.to_string().as_bytes());
        }
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut buffer = EventBuffer::new();
        for n in 0..=MAX_UNSENT_EVENTS {
            buffer.append(event(n));
        }

        // Bound held, first event evicted, the rest in original order
        assert_eq!(buffer.len(), MAX_UNSENT_EVENTS);
        let batch = buffer.take_batch(2);
        assert_eq!(batch[0].payload(), b"1");
        assert_eq!(batch[1].payload(), b"2");
    }

    #[test]
    fn test_take_batch_is_a_peek() {
        let mut buffer = EventBuffer::new();
        buffer.append(event(0));
        buffer.append(event(1));

        let batch = buffer.take_batch(1);
        assert_eq!(batch.len(), 1);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_drain_removes_prefix() {
        let mut buffer = EventBuffer::new();
        for n in 0..4 {
            buffer.append(event(n));
        }

        buffer.drain(2);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.take_batch(1)[0].payload(), b"2");
    }

    #[test]
    fn test_drain_past_end_empties_buffer() {
        let mut buffer = EventBuffer::new();
        buffer.append(event(0));

        buffer.drain(10);
        assert!(buffer.is_empty());
    }
}
