//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `MUON_YIELD_LOG=muon_yield=debug`.
pub const LOG_ENV: &str = "MUON_YIELD_LOG";
const DEFAULT_FILTER: &str = "muon_yield=info";

static INIT: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
