//! Tracing subscriber setup for hosts that don't install their own.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "fieldboard=info";

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default
/// [`DEFAULT_FILTER`]). Returns false if a global subscriber already exists.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    init_with_filter(filter)
}

/// Install a `fmt` subscriber with an explicit filter.
pub fn init_with_filter(filter: impl Into<EnvFilter>) -> bool {
    tracing_subscriber::registry()
        .with(filter.into())
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
