//! Tracing subscriber setup for binaries and demos
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the process entry point.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,devpage_infra=debug";

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once: later calls leave the installed subscriber
/// in place and return `false`.
pub fn init_tracing() -> bool {
    init_tracing_with(DEFAULT_FILTER)
}

/// Like [`init_tracing`] with a custom fallback filter.
pub fn init_tracing_with(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
