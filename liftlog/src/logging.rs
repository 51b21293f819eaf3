//! Log output.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs a compact global subscriber. `RUST_LOG` overrides the level
/// chosen by `verbose`. Returns false if a subscriber was already set.
pub fn init(verbose: bool) -> bool {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
