//! The `log` call kind.
//!
//! Log records travel as `(level, utf-8 message)` with no response body.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a log record, encoded on the wire as a small integer.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Debug-level logging.
    Debug = 0,
    /// Info-level logging.
    Info = 1,
    /// Warning-level logging.
    Warn = 2,
    /// Error-level logging.
    Error = 3,
}

impl Level {
    /// Wire code of the level.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Strict decoding of a wire code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Debug),
            1 => Some(Self::Info),
            2 => Some(Self::Warn),
            3 => Some(Self::Error),
            _ => None,
        }
    }
}

/// Lenient decoding: unknown codes are treated as errors.
impl From<i32> for Level {
    fn from(code: i32) -> Self {
        Self::from_code(code).unwrap_or(Self::Error)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// A formatted log record, ready to cross the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity.
    pub level: Level,
    /// Message text.
    pub message: String,
}

impl LogRecord {
    /// Format a record. Returns `None` when the message is empty, in which
    /// case nothing is sent.
    pub fn format(level: Level, args: fmt::Arguments<'_>) -> Option<Self> {
        let message = fmt::format(args);
        if message.is_empty() {
            return None;
        }
        Some(Self { level, message })
    }
}

/// Send a formatted log record through a [`HostBridge`](crate::bridge::HostBridge).
///
/// ```
/// use modwire::bridge::{HostBridge, Level};
/// use modwire::host_log;
/// use modwire::testing::MockTransport;
///
/// let mut bridge = HostBridge::new(MockTransport::new());
/// host_log!(bridge, Level::Info, "processed {} items", 3);
/// host_log!(bridge, Level::Debug, "");
/// assert_eq!(bridge.transport().notifications().len(), 1);
/// ```
#[macro_export]
macro_rules! host_log {
    ($bridge:expr, $level:expr, $($arg:tt)+) => {
        $bridge.log($level, format_args!($($arg)+))
    };
}
