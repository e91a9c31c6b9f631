//! Subscriber setup for binaries and test harnesses.
//!
//! Both installers read `RUST_LOG` first and fall back to the given directive.
//! Installing twice is harmless: the second call reports `false`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a human-readable subscriber. Returns whether this call installed it.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(filter(default_directive))
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

/// Install a JSON-lines subscriber with span context on every event.
/// Returns whether this call installed it.
pub fn init_json_tracing(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(filter(default_directive))
        .with(fmt::layer().json().with_current_span(true).with_span_list(true))
        .try_init()
        .is_ok()
}
