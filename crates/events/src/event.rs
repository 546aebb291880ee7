use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - **human-readable**: `Display` is the audit-trail line for the event
pub trait Event: Clone + core::fmt::Debug + core::fmt::Display {
    /// Stable event name/type identifier (e.g. "banking.account.deposited").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
