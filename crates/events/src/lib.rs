//! Domain events and the in-memory audit trail they are recorded in.

pub mod audit;
pub mod envelope;
pub mod event;

pub use audit::AuditTrail;
pub use envelope::EventEnvelope;
pub use event::Event;
