//! Error types for modwire.

use thiserror::Error;

/// Main error type for all modwire operations.
#[derive(Debug, Error)]
pub enum ModwireError {
    /// I/O error on the standard streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error on the module side.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No header line was present on the input channel.
    #[error("missing header JSON on stdin")]
    MissingHeader,

    /// The header line was not a valid `{opts, args}` object.
    #[error("failed to parse header JSON: {0}")]
    InvalidHeader(#[source] serde_json::Error),

    /// A command was built without an executable.
    #[error("command argv is empty")]
    EmptyArgv,

    /// The host reported a failure sentinel instead of a response length.
    #[error("host call `{function}` failed ({code}): {}", status_text(.code))]
    HostCallFailed {
        /// Host function identifier.
        function: &'static str,
        /// Negative status returned across the boundary.
        code: i32,
    },

    /// The host claimed to write more bytes than the response buffer holds.
    #[error("host call `{function}` wrote {written} bytes into a {capacity} byte buffer")]
    ResponseOverflow {
        /// Host function identifier.
        function: &'static str,
        /// Length reported by the host.
        written: usize,
        /// Declared buffer capacity.
        capacity: usize,
    },

    /// The response bytes did not decode into the expected shape.
    #[error("bad host response for `{function}`: {source}")]
    BadHostResponse {
        /// Host function identifier.
        function: &'static str,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The host ran the command and it exited non-zero.
    #[error("exit {exit_code}: {stderr}")]
    RemoteExitNonZero {
        /// Exit code reported by the host.
        exit_code: i32,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The host function was invoked through the wrong call shape.
    #[error("host function `{0}` does not support this call shape")]
    UnsupportedCall(&'static str),

    /// A descriptor document could not be decoded.
    #[error("invalid module descriptor: {0}")]
    InvalidDescriptor(#[source] serde_json::Error),

    /// Framing violation on the output channel.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl ModwireError {
    /// True for failures of the host-call transport itself.
    ///
    /// A non-zero remote exit is not a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::HostCallFailed { .. } | Self::ResponseOverflow { .. } | Self::BadHostResponse { .. }
        )
    }

    /// True for failures to read the invocation header.
    pub fn is_envelope(&self) -> bool {
        matches!(self, Self::MissingHeader | Self::InvalidHeader(_))
    }
}

fn status_text(code: &i32) -> &'static str {
    crate::transport::status::describe(*code)
}

/// Result type alias using ModwireError.
pub type Result<T> = std::result::Result<T, ModwireError>;
