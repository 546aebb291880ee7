//! Append-only in-memory audit trail.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::envelope::EventEnvelope;
use crate::event::Event;

/// Human-readable log of every accepted ledger mutation.
///
/// - Entries are never removed or rewritten.
/// - Sequence numbers start at 1 and increase by one per aggregate stream.
/// - A stream is identified by `(aggregate_type, aggregate_id)`.
#[derive(Debug, Clone, Serialize)]
pub struct AuditTrail<E> {
    entries: Vec<EventEnvelope<E>>,
    #[serde(skip)]
    cursors: HashMap<(String, String), u64>,
}

impl<E> Default for AuditTrail<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursors: HashMap::new(),
        }
    }
}

impl<E: Event> AuditTrail<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append events for one aggregate stream; returns the newly recorded envelopes.
    pub fn record(
        &mut self,
        aggregate_type: &str,
        aggregate_id: &str,
        events: impl IntoIterator<Item = E>,
    ) -> &[EventEnvelope<E>] {
        let start = self.entries.len();
        let cursor = self
            .cursors
            .entry((aggregate_type.to_string(), aggregate_id.to_string()))
            .or_insert(0);

        for event in events {
            *cursor += 1;
            self.entries.push(EventEnvelope::new(
                Uuid::now_v7(),
                aggregate_id,
                aggregate_type,
                *cursor,
                event,
            ));
        }

        &self.entries[start..]
    }

    pub fn entries(&self) -> &[EventEnvelope<E>] {
        &self.entries
    }

    /// All envelopes of one aggregate, in recording order.
    pub fn stream<'a>(
        &'a self,
        aggregate_type: &'a str,
        aggregate_id: &'a str,
    ) -> impl Iterator<Item = &'a EventEnvelope<E>> + 'a {
        self.entries.iter().filter(move |e| {
            e.aggregate_type() == aggregate_type && e.aggregate_id() == aggregate_id
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Event> core::fmt::Display for AuditTrail<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "#{} {}/{} {}: {}",
                entry.sequence_number(),
                entry.aggregate_type(),
                entry.aggregate_id(),
                entry.payload().event_type(),
                entry.payload()
            )?;
        }
        Ok(())
    }
}
