//! Logging setup shared by the stockyard binaries.

/// Initialize process-wide logging.
///
/// Output format comes from `LOG_FORMAT` (`json` or `pretty`, with `text` as an
/// alias for `pretty`; default json);
/// filtering from `RUST_LOG` (default `info`). Later calls are no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    tracing::init(format);
}

/// Subscriber construction (filters, formatters).
pub mod tracing;

pub use crate::tracing::LogFormat;
