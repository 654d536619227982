//! Logging initialization and configuration.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,arbor=debug";

/// Initialize the logging system with tracing.
///
/// This sets up tracing-subscriber with:
/// - Environment-based filtering (RUST_LOG), falling back to [`DEFAULT_LOG_FILTER`]
/// - Target and thread ids in every line
///
/// # Example
/// ```no_run
/// arbor_core::init_logging();
/// tracing::info!("Scene initialized");
/// ```
pub fn init_logging() {
    init_logging_with(DEFAULT_LOG_FILTER);
}

/// Initialize logging with an explicit fallback filter.
///
/// `RUST_LOG` still takes precedence when present. Calling this more than
/// once is harmless: later calls leave the first subscriber installed.
pub fn init_logging_with(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .try_init();
}
