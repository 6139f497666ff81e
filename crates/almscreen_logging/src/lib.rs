//! Shared logging setup for the almscreen binary.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "almscreen=info,almscreen_dms=info";

/// Logging configuration
pub struct LogConfig {
    /// Promote the console filter to debug for all crates
    pub verbose: bool,
}

/// Initialize tracing with stderr output.
///
/// `RUST_LOG` overrides the default filter; `--verbose` overrides both.
pub fn init_logging(config: LogConfig) -> Result<()> {
    let filter = if config.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init()?;

    Ok(())
}
