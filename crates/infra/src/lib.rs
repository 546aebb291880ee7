//! Infrastructure layer: safe file writes, configuration, audit export.

pub mod config;
pub mod error;
pub mod export;
pub mod safe_write;

pub use config::AppConfig;
pub use error::{InfraError, InfraResult};
pub use safe_write::{SafeWriter, write_atomically};
