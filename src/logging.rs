//! Tracing setup for hosts, test suites and benches.
//!
//! ```rust
//! contrail::logging::init_tracing();
//! tracing::debug!(target: "contrail::trampoline", "visible with RUST_LOG=contrail=debug");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "contrail=warn";

/// Install a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer().with_target(true).without_time().compact();
    // Fails only when a global subscriber already exists.
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
