//! Tracing subscriber setup.
//!
//! Every layer writes to stderr. Stdout belongs to the envelope and carries
//! exactly one JSON line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, LogFormat, DEFAULT_LOG_FILTER};
use crate::error::{ModwireError, Result};

/// Build the filter for a configuration.
///
/// An unparsable directive falls back to the default filter.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns [`ModwireError::Logging`] if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = env_filter(config);

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| ModwireError::Logging(e.to_string()))
}

/// Install the subscriber configured by the environment, ignoring failure.
///
/// Meant for module `main` functions where a second install is harmless.
pub fn init_from_env() {
    if let Err(e) = init_logging(&LogConfig::from_env()) {
        eprintln!("{}", e);
    }
}
