//! Tracing and logging (shared setup).

/// Environment-driven settings.
pub mod config;

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig, UnknownLogFormat};

/// Initialize process-wide observability from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&ObservabilityConfig::from_env());
}
