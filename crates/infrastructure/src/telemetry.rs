//! Tracing initialization.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a formatting subscriber filtered by `RUST_LOG`, or `default_filter` when
/// `RUST_LOG` is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed; the call is then a
/// no-op, so suites may call it unconditionally.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
