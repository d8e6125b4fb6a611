// Logging module - Logging infrastructure
use crate::domain::error::{BridgeError, BridgeResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter. Quiet enough not to interleave with an interactive session.
const DEFAULT_FILTER: &str = "termbridge=warn";
const VERBOSE_FILTER: &str = "termbridge=debug";

/// Build the log filter. `RUST_LOG` wins over the built-in defaults.
pub fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    })
}

/// Initialize logging system.
///
/// Logs always go to stderr; stdout carries the bridged byte stream.
pub fn init_logging(verbose: bool) -> BridgeResult<()> {
    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .try_init()
        .map_err(|e| BridgeError::Output(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!("TermBridge logging system initialized");
    Ok(())
}
