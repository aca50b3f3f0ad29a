//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter (EnvFilter syntax).
pub const LOG_ENV: &str = "MOVEDB_LOG";

/// Install a fmt subscriber filtered by `MOVEDB_LOG` (default `warn`).
///
/// Returns false when a global subscriber is already installed, so calling
/// this more than once is harmless.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false));
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
