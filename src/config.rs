//! Configuration for the bridge, the envelope and logging.
//!
//! All three have sensible defaults, builder-style setters, and a
//! `from_env()` constructor:
//!
//! - `MODWIRE_RESPONSE_CAPACITY`: response buffer size in bytes
//! - `MODWIRE_DOC_TOKEN`: the `opts` token that requests documentation
//! - `MODWIRE_LOG` or `RUST_LOG`: log filter string
//! - `MODWIRE_LOG_FORMAT`: "compact" or "json"

use std::env;
use std::str::FromStr;

/// Default response buffer capacity (256 KiB).
pub const DEFAULT_RESPONSE_CAPACITY: usize = 256 * 1024;

/// Default documentation-request token.
pub const DEFAULT_DOC_TOKEN: &str = "man";

/// Default log filter when nothing is configured.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Configuration for [`HostBridge`](crate::bridge::HostBridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Capacity of the module-owned response buffer.
    pub response_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            response_capacity: DEFAULT_RESPONSE_CAPACITY,
        }
    }
}

impl BridgeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response buffer capacity. Zero keeps the default.
    pub fn response_capacity(mut self, capacity: usize) -> Self {
        if capacity > 0 {
            self.response_capacity = capacity;
        }
        self
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let capacity = lookup("MODWIRE_RESPONSE_CAPACITY")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(0);
        Self::default().response_capacity(capacity)
    }
}

/// Configuration for [`Envelope`](crate::envelope::Envelope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// Token in `opts` that switches the module into documentation mode.
    pub doc_token: String,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            doc_token: DEFAULT_DOC_TOKEN.to_string(),
        }
    }
}

impl EnvelopeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the documentation token. Blank tokens keep the current one.
    pub fn doc_token(mut self, token: &str) -> Self {
        let token = token.trim();
        if !token.is_empty() {
            self.doc_token = token.to_string();
        }
        self
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup("MODWIRE_DOC_TOKEN") {
            Some(token) => Self::default().doc_token(&token),
            None => Self::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format.
    #[default]
    Compact,
    /// JSON format for structured collection by the host.
    Json,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        })
    }
}

/// Configuration for [`init_logging`](crate::logging::init_logging).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive (e.g., "info", "warn,modwire=debug").
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter directive.
    pub fn filter(mut self, filter: &str) -> Self {
        self.filter = filter.to_string();
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = lookup("MODWIRE_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let format = lookup("MODWIRE_LOG_FORMAT")
            .and_then(|s| s.parse::<LogFormat>().ok())
            .unwrap_or_default();

        Self { filter, format }
    }
}
