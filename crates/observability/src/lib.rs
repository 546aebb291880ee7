//! Tracing/logging (shared setup).

/// Initialize process-wide tracing.
///
/// `debug` lowers the default level from `info` to `debug`; `RUST_LOG` always wins.
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(debug: bool) {
    tracing::init(if debug { "debug" } else { "info" });
}

/// Tracing configuration (filters, layers).
pub mod tracing;
