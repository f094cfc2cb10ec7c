//! Module trait and the application-level error payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Header;
use crate::descriptor::Descriptor;
use crate::error::ModwireError;

/// Result of running a module: a result mapping or an encoded failure.
///
/// Both sides are written to stdout and both exit 0.
pub type Outcome = std::result::Result<Map<String, Value>, ApplicationError>;

/// A compute module served through an [`Envelope`](super::Envelope).
pub trait Module {
    /// Self-description returned in documentation mode.
    fn descriptor(&self) -> Descriptor;

    /// Run the module logic against one header.
    fn run(&mut self, header: &Header) -> Outcome;
}

impl<M: Module + ?Sized> Module for Box<M> {
    fn descriptor(&self) -> Descriptor {
        (**self).descriptor()
    }

    fn run(&mut self, header: &Header) -> Outcome {
        (**self).run(header)
    }
}

/// Domain failure encoded as a normal output payload.
///
/// Serializes as `{"error": ..., "detail"?: ..., <extra fields>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationError {
    /// Short description of what went wrong.
    pub error: String,
    /// Optional longer explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Additional context fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApplicationError {
    /// Create an error with only a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            extra: Map::new(),
        }
    }

    /// Attach a detail string.
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach a context field. `error` and `detail` cannot be shadowed.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if key != "error" && key != "detail" {
            self.extra.insert(key.to_string(), value.into());
        }
        self
    }

    /// Convert into the payload object.
    pub fn into_payload(self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("error".to_string(), Value::String(self.error));
        if let Some(detail) = self.detail {
            payload.insert("detail".to_string(), Value::String(detail));
        }
        for (key, value) in self.extra {
            payload.entry(key).or_insert(value);
        }
        payload
    }
}

impl std::fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.error, detail),
            None => write!(f, "{}", self.error),
        }
    }
}

impl From<ModwireError> for ApplicationError {
    fn from(err: ModwireError) -> Self {
        match err {
            ModwireError::RemoteExitNonZero {
                exit_code,
                stdout,
                stderr,
            } => Self::new("command exited non-zero")
                .detail(stderr.trim())
                .with("exit_code", exit_code)
                .with("stdout", stdout)
                .with("stderr", stderr),
            err if err.is_transport() => Self::new("host call failed").detail(err.to_string()),
            err => Self::new(err.to_string()),
        }
    }
}
