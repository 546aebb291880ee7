//! Demonstration scenarios for the banking and dealership ledgers.

pub mod app;
pub mod demo;
pub mod event;
pub mod transcript;

pub use event::LedgerEvent;
pub use transcript::Transcript;
