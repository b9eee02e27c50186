use std::{io, sync::Once};

static TRACING_INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Logs go to stderr so they never land in the
/// middle of a prompt; `RUST_LOG` overrides the default level.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .try_init();
    });
}
