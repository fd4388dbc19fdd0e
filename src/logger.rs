pub use tracing::{debug, error, info, instrument, trace, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

/// Filter used when `RUST_LOG` is unset: resolver stages at info, notices at warn.
const DEFAULT_DIRECTIVE: &str = "photo_meta_rs=info";

/// Installs the global subscriber used by the `photo_meta_rs` binary.
///
/// The library itself only emits events; callers embedding it bring their own
/// subscriber.
pub fn init() {
    init_with_default(DEFAULT_DIRECTIVE);
}

/// Like [`init`] with a caller-chosen fallback filter. Logs go to stderr so the
/// JSON written to stdout stays clean. A second call is a no-op.
pub fn init_with_default(default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Stage spans are only worth their timing output when debugging
    let span_events = if env_filter.to_string().contains("debug") || env_filter.to_string().contains("trace") {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
