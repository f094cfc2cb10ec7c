//! Bridge module - typed host calls built on the transport.
//!
//! Provides:
//! - [`HostBridge`] - owns a [`Transport`] and the module's [`ResponseBuffer`]
//! - [`Command`] / [`CommandOutput`] - the `exec` call kind
//! - [`Level`] / [`LogRecord`] - the `log` call kind
//!
//! Error kinds stay distinct: a command that ran and exited non-zero is
//! [`ModwireError::RemoteExitNonZero`]; a failure of the crossing itself is
//! [`ModwireError::HostCallFailed`], [`ModwireError::ResponseOverflow`] or
//! [`ModwireError::BadHostResponse`]. Nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use modwire::bridge::{connect, Command, Level};
//! use modwire::host_log;
//!
//! let mut bridge = connect();
//! let out = bridge.exec(&Command::new("/usr/bin/uname").arg("-a"))?;
//! host_log!(bridge, Level::Info, "uname said {}", out.trim());
//! ```

mod exec;
mod log;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use exec::{Command, CommandOutput, CommandRequest};
pub use log::{Level, LogRecord};

use crate::codec::JsonCodec;
use crate::config::BridgeConfig;
use crate::error::{ModwireError, Result};
use crate::transport::{CallShape, DefaultTransport, HostFunction, ResponseBuffer, Transport};

/// Typed access to host functions.
///
/// The bridge is an explicit value: the transport and the response buffer
/// live here, not in process-wide state.
pub struct HostBridge<T: Transport> {
    transport: T,
    response: ResponseBuffer,
}

impl<T: Transport> HostBridge<T> {
    /// Create a bridge with the default response capacity.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, &BridgeConfig::default())
    }

    /// Create a bridge with a specific response capacity.
    pub fn with_capacity(transport: T, capacity: usize) -> Self {
        Self {
            transport,
            response: ResponseBuffer::with_capacity(capacity),
        }
    }

    /// Create a bridge from configuration.
    pub fn with_config(transport: T, config: &BridgeConfig) -> Self {
        Self::with_capacity(transport, config.response_capacity)
    }

    /// Capacity of the response buffer.
    pub fn capacity(&self) -> usize {
        self.response.capacity()
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Borrow the transport mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the bridge and return the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Generic request/response call.
    ///
    /// Encodes `request` as JSON, crosses the boundary, and decodes the
    /// written bytes as `Resp`.
    ///
    /// # Errors
    ///
    /// Transport failures as described in the module docs.
    pub fn call<Req, Resp>(&mut self, function: HostFunction, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        if function.shape() != CallShape::RequestResponse {
            return Err(ModwireError::UnsupportedCall(function.name()));
        }

        let body = JsonCodec::encode(request)?;
        let bytes = self
            .response
            .exchange(&mut self.transport, function, &body)?;

        JsonCodec::decode_raw(bytes).map_err(|source| ModwireError::BadHostResponse {
            function: function.name(),
            source,
        })
    }

    /// Run a command and return the host's full report.
    ///
    /// A non-zero exit is not an error here.
    pub fn exec_output(&mut self, command: &Command) -> Result<CommandOutput> {
        let request = command.request()?;
        tracing::debug!(program = command.program(), "exec");
        self.call(HostFunction::Exec, &request)
    }

    /// Run a command and return its stdout.
    ///
    /// # Errors
    ///
    /// [`ModwireError::RemoteExitNonZero`] carries the exit code, stdout and
    /// stderr when the command fails; transport errors are returned as-is.
    pub fn exec(&mut self, command: &Command) -> Result<String> {
        self.exec_output(command)?.into_stdout()
    }

    /// Send a formatted log record. Empty messages are not sent.
    ///
    /// Logging never fails from the caller's point of view.
    pub fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        if let Some(record) = LogRecord::format(level, args) {
            self.send_log(&record);
        }
    }

    /// Send an already formatted log record. Empty messages are not sent.
    pub fn send_log(&mut self, record: &LogRecord) {
        if record.message.is_empty() {
            return;
        }
        self.transport
            .notify(HostFunction::Log, record.level.code(), record.message.as_bytes());
    }

    /// Log at debug level.
    pub fn debug(&mut self, message: &str) {
        self.log(Level::Debug, format_args!("{}", message));
    }

    /// Log at info level.
    pub fn info(&mut self, message: &str) {
        self.log(Level::Info, format_args!("{}", message));
    }

    /// Log at warn level.
    pub fn warn(&mut self, message: &str) {
        self.log(Level::Warn, format_args!("{}", message));
    }

    /// Log at error level.
    pub fn error(&mut self, message: &str) {
        self.log(Level::Error, format_args!("{}", message));
    }
}

/// Bridge over the default transport of this target.
pub fn connect() -> HostBridge<DefaultTransport> {
    HostBridge::with_config(DefaultTransport::default(), &BridgeConfig::from_env())
}
