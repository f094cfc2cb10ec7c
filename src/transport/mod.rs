//! Transport module - the linear-memory boundary between module and host.
//!
//! The module never hands the host anything but `(pointer, length)` pairs
//! into buffers it owns:
//! - the request bytes, valid for the duration of one call
//! - a fixed-capacity [`ResponseBuffer`] the host may write into
//!
//! The host answers with the number of bytes written, or a negative
//! [`status`] sentinel. Nothing else crosses the boundary.
//!
//! Implementations:
//! - [`WasmHost`] - the `api` imports of a real host runtime (wasm32 only)
//! - [`LocalHost`] - native emulation of the host for development and tests
//! - [`MockTransport`](crate::testing::MockTransport) - scripted test double

mod buffer;
#[cfg(not(target_arch = "wasm32"))]
mod local;
#[cfg(target_arch = "wasm32")]
mod wasm;

use std::fmt;

pub use buffer::ResponseBuffer;
#[cfg(not(target_arch = "wasm32"))]
pub use local::{write_bounded, LocalHost};
#[cfg(target_arch = "wasm32")]
pub use wasm::WasmHost;

/// Transport used by [`connect`](crate::bridge::connect) on this target.
#[cfg(target_arch = "wasm32")]
pub type DefaultTransport = WasmHost;

/// Transport used by [`connect`](crate::bridge::connect) on this target.
#[cfg(not(target_arch = "wasm32"))]
pub type DefaultTransport = LocalHost;

/// Status sentinels returned across the boundary instead of a length.
pub mod status {
    /// The host could not service the call.
    pub const HOST_FAILURE: i32 = -1;
    /// The response did not fit in the declared capacity.
    pub const CAPACITY_EXCEEDED: i32 = -2;
    /// The request bytes were not a valid request for this function.
    pub const BAD_REQUEST: i32 = -3;
    /// The host does not provide this function.
    pub const UNSUPPORTED: i32 = -4;

    /// Check if a raw return value is a failure sentinel.
    #[inline]
    pub fn is_failure(code: i32) -> bool {
        code < 0
    }

    /// Human-readable description of a sentinel.
    pub fn describe(code: i32) -> &'static str {
        match code {
            HOST_FAILURE => "host could not service the call",
            CAPACITY_EXCEEDED => "response exceeds buffer capacity",
            BAD_REQUEST => "host rejected the request",
            UNSUPPORTED => "host function not provided",
            c if c < 0 => "unknown host failure",
            _ => "ok",
        }
    }
}

/// How a host function exchanges data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// Request bytes in, bounded response bytes out.
    RequestResponse,
    /// Small integer code plus payload bytes in, nothing out.
    Notify,
}

/// Host functions reachable from a module.
///
/// Each variant has a fixed wire identifier and a fixed call shape.
/// New call kinds are added as new variants with new identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFunction {
    /// Run a command on the host.
    Exec,
    /// Emit a log record to the host's sink.
    Log,
}

impl HostFunction {
    /// Every host function, in declaration order.
    pub const ALL: [HostFunction; 2] = [HostFunction::Exec, HostFunction::Log];

    /// Wire identifier of the function.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exec => "exec",
            Self::Log => "log",
        }
    }

    /// Call shape of the function.
    pub const fn shape(self) -> CallShape {
        match self {
            Self::Exec => CallShape::RequestResponse,
            Self::Log => CallShape::Notify,
        }
    }

    /// Look up a function by wire identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The raw boundary crossing.
///
/// Calls are strictly sequential: `&mut self` means one call completes
/// before the next is issued, and no buffer is retained across calls.
pub trait Transport {
    /// Request/response crossing.
    ///
    /// The host reads `request` and may write at most `response.len()`
    /// bytes into `response`. Returns the number of bytes written, or a
    /// negative [`status`] sentinel.
    fn call(&mut self, function: HostFunction, request: &[u8], response: &mut [u8]) -> i32;

    /// One-way crossing. Nothing is read back and nothing is reported.
    fn notify(&mut self, function: HostFunction, code: i32, payload: &[u8]);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn call(&mut self, function: HostFunction, request: &[u8], response: &mut [u8]) -> i32 {
        (**self).call(function, request, response)
    }

    fn notify(&mut self, function: HostFunction, code: i32, payload: &[u8]) {
        (**self).notify(function, code, payload)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn call(&mut self, function: HostFunction, request: &[u8], response: &mut [u8]) -> i32 {
        (**self).call(function, request, response)
    }

    fn notify(&mut self, function: HostFunction, code: i32, payload: &[u8]) {
        (**self).notify(function, code, payload)
    }
}
