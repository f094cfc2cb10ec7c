//! Module-owned response buffer.
//!
//! Uses `bytes::BytesMut` as fixed-size backing storage. The buffer is
//! allocated once at full capacity and lent to the host for the duration of
//! a single call; the host learns only its address and its length.

use bytes::BytesMut;

use super::{status, CallShape, HostFunction, Transport};
use crate::config::DEFAULT_RESPONSE_CAPACITY;
use crate::error::{ModwireError, Result};

/// Largest capacity that can still be reported back as an `i32` length.
const MAX_CAPACITY: usize = i32::MAX as usize;

/// Fixed-capacity region for receiving host responses.
pub struct ResponseBuffer {
    /// Zero-initialized storage; its length is the declared capacity.
    buf: BytesMut,
}

impl ResponseBuffer {
    /// Create a buffer with the default 256 KiB capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RESPONSE_CAPACITY)
    }

    /// Create a buffer with the given capacity.
    ///
    /// Capacity is clamped to `1..=i32::MAX`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CAPACITY);
        Self {
            buf: BytesMut::zeroed(capacity),
        }
    }

    /// Declared capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Perform one request/response crossing and return the written bytes.
    ///
    /// The returned slice borrows the buffer and is only valid until the next
    /// call. A negative result never yields a slice.
    ///
    /// # Errors
    ///
    /// - [`ModwireError::UnsupportedCall`] if `function` is not request/response
    /// - [`ModwireError::HostCallFailed`] on a negative sentinel
    /// - [`ModwireError::ResponseOverflow`] if the host claims more bytes than fit
    pub fn exchange<T>(
        &mut self,
        transport: &mut T,
        function: HostFunction,
        request: &[u8],
    ) -> Result<&[u8]>
    where
        T: Transport + ?Sized,
    {
        if function.shape() != CallShape::RequestResponse {
            return Err(ModwireError::UnsupportedCall(function.name()));
        }

        let capacity = self.capacity();
        let code = transport.call(function, request, &mut self.buf[..]);

        if status::is_failure(code) {
            tracing::debug!(
                function = function.name(),
                code,
                "host call failed: {}",
                status::describe(code)
            );
            return Err(ModwireError::HostCallFailed {
                function: function.name(),
                code,
            });
        }

        let written = code as usize;
        if written > capacity {
            tracing::warn!(
                function = function.name(),
                written,
                capacity,
                "host reported more bytes than the buffer holds"
            );
            return Err(ModwireError::ResponseOverflow {
                function: function.name(),
                written,
                capacity,
            });
        }

        Ok(&self.buf[..written])
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Transport that writes a fixed body and reports a chosen length.
    struct Fixed {
        body: Vec<u8>,
        report: Option<i32>,
        seen_capacity: usize,
        calls: usize,
    }

    impl Fixed {
        fn new(body: &[u8]) -> Self {
            Self {
                body: body.to_vec(),
                report: None,
                seen_capacity: 0,
                calls: 0,
            }
        }
    }

    impl Transport for Fixed {
        fn call(&mut self, _: HostFunction, _: &[u8], response: &mut [u8]) -> i32 {
            self.calls += 1;
            self.seen_capacity = response.len();
            let n = self.body.len().min(response.len());
            response[..n].copy_from_slice(&self.body[..n]);
            self.report.unwrap_or(n as i32)
        }

        fn notify(&mut self, _: HostFunction, _: i32, _: &[u8]) {}
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(ResponseBuffer::new().capacity(), 262_144);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(ResponseBuffer::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn test_exchange_returns_written_prefix() {
        let mut buf = ResponseBuffer::with_capacity(64);
        let mut host = Fixed::new(b"{\"ok\":true}");

        let out = buf.exchange(&mut host, HostFunction::Exec, b"{}").unwrap();
        assert_eq!(out, b"{\"ok\":true}");
        assert_eq!(host.seen_capacity, 64);
    }

    #[test]
    fn test_exchange_empty_response() {
        let mut buf = ResponseBuffer::with_capacity(8);
        let mut host = Fixed::new(b"");
        let out = buf.exchange(&mut host, HostFunction::Exec, b"{}").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_exchange_negative_is_failure() {
        let mut buf = ResponseBuffer::with_capacity(64);
        let mut host = Fixed::new(b"garbage");
        host.report = Some(status::HOST_FAILURE);

        let err = buf.exchange(&mut host, HostFunction::Exec, b"{}").unwrap_err();
        assert!(matches!(
            err,
            ModwireError::HostCallFailed {
                function: "exec",
                code: -1
            }
        ));
    }

    #[test]
    fn test_exchange_overflow_is_rejected() {
        let mut buf = ResponseBuffer::with_capacity(4);
        let mut host = Fixed::new(b"0123456789");
        host.report = Some(10);

        let err = buf.exchange(&mut host, HostFunction::Exec, b"{}").unwrap_err();
        match err {
            ModwireError::ResponseOverflow {
                written, capacity, ..
            } => {
                assert_eq!(written, 10);
                assert_eq!(capacity, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exchange_exactly_full_is_accepted() {
        let mut buf = ResponseBuffer::with_capacity(4);
        let mut host = Fixed::new(b"abcd");
        let out = buf.exchange(&mut host, HostFunction::Exec, b"").unwrap();
        assert_eq!(out, b"abcd");
    }

    #[test]
    fn test_exchange_refuses_notify_function() {
        let mut buf = ResponseBuffer::with_capacity(16);
        let mut host = Fixed::new(b"{}");

        let err = buf.exchange(&mut host, HostFunction::Log, b"hi").unwrap_err();
        assert!(matches!(err, ModwireError::UnsupportedCall("log")));
        assert_eq!(host.calls, 0);
    }

    #[test]
    fn test_buffer_reused_across_calls() {
        let mut buf = ResponseBuffer::with_capacity(32);

        let mut long = Fixed::new(b"a long first response");
        assert_eq!(buf.exchange(&mut long, HostFunction::Exec, b"").unwrap().len(), 21);

        let mut short = Fixed::new(b"short");
        assert_eq!(buf.exchange(&mut short, HostFunction::Exec, b"").unwrap(), b"short");
    }
}
