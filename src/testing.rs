//! Test double for the transport.
//!
//! [`MockTransport`] records every crossing and replays scripted host
//! behaviour, so bridge logic can be tested without a host runtime.
//!
//! ```
//! use modwire::bridge::{Command, HostBridge};
//! use modwire::testing::MockTransport;
//! use serde_json::json;
//!
//! let mut mock = MockTransport::new();
//! mock.reply_json(&json!({"exit_code": 0, "stdout": "ok", "stderr": ""}));
//!
//! let mut bridge = HostBridge::new(mock);
//! assert_eq!(bridge.exec(&Command::new("true")).unwrap(), "ok");
//! assert_eq!(bridge.transport().call_count(), 1);
//! ```

use std::collections::VecDeque;

use crate::transport::{status, HostFunction, Transport};

/// Scripted outcome of one request/response call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// Write these bytes and report their length.
    ///
    /// Bytes beyond the buffer are dropped but the full length is still
    /// reported, the way a misbehaving host would.
    Reply(Vec<u8>),
    /// Report this status without writing anything.
    Status(i32),
    /// Report this length without writing anything.
    Claim(usize),
}

/// Kind of recorded crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedKind {
    /// Request/response call.
    Call,
    /// One-way notification.
    Notify,
}

/// One recorded crossing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    /// Crossing kind.
    pub kind: RecordedKind,
    /// Host function invoked.
    pub function: HostFunction,
    /// Notification code (zero for calls).
    pub code: i32,
    /// Request or notification bytes.
    pub payload: Vec<u8>,
    /// Buffer capacity offered (zero for notifications).
    pub capacity: usize,
}

/// Scriptable, recording transport.
///
/// Calls with nothing scripted answer [`status::HOST_FAILURE`].
#[derive(Debug, Default)]
pub struct MockTransport {
    script: VecDeque<Scripted>,
    recorded: Vec<Recorded>,
}

impl MockTransport {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome.
    pub fn push(&mut self, outcome: Scripted) -> &mut Self {
        self.script.push_back(outcome);
        self
    }

    /// Queue a JSON reply.
    pub fn reply_json<T: serde::Serialize>(&mut self, value: &T) -> &mut Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        self.push(Scripted::Reply(body))
    }

    /// Queue a raw reply.
    pub fn reply_raw(&mut self, body: &[u8]) -> &mut Self {
        self.push(Scripted::Reply(body.to_vec()))
    }

    /// Queue a failure sentinel.
    pub fn fail(&mut self, code: i32) -> &mut Self {
        self.push(Scripted::Status(code))
    }

    /// Queue a reported length with no data behind it.
    pub fn claim(&mut self, len: usize) -> &mut Self {
        self.push(Scripted::Claim(len))
    }

    /// Every crossing, in order.
    pub fn recorded(&self) -> &[Recorded] {
        &self.recorded
    }

    /// Request/response calls only.
    pub fn calls(&self) -> Vec<&Recorded> {
        self.filter(RecordedKind::Call)
    }

    /// Notifications only.
    pub fn notifications(&self) -> Vec<&Recorded> {
        self.filter(RecordedKind::Notify)
    }

    /// Number of request/response calls.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Number of outcomes still queued.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn filter(&self, kind: RecordedKind) -> Vec<&Recorded> {
        self.recorded.iter().filter(|r| r.kind == kind).collect()
    }
}

impl Transport for MockTransport {
    fn call(&mut self, function: HostFunction, request: &[u8], response: &mut [u8]) -> i32 {
        self.recorded.push(Recorded {
            kind: RecordedKind::Call,
            function,
            code: 0,
            payload: request.to_vec(),
            capacity: response.len(),
        });

        match self.script.pop_front() {
            Some(Scripted::Reply(body)) => {
                let n = body.len().min(response.len());
                response[..n].copy_from_slice(&body[..n]);
                i32::try_from(body.len()).unwrap_or(i32::MAX)
            }
            Some(Scripted::Status(code)) => code,
            Some(Scripted::Claim(len)) => i32::try_from(len).unwrap_or(i32::MAX),
            None => status::HOST_FAILURE,
        }
    }

    fn notify(&mut self, function: HostFunction, code: i32, payload: &[u8]) {
        self.recorded.push(Recorded {
            kind: RecordedKind::Notify,
            function,
            code,
            payload: payload.to_vec(),
            capacity: 0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscripted_call_fails() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 8];
        assert_eq!(mock.call(HostFunction::Exec, b"{}", &mut buf), status::HOST_FAILURE);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_reply_reports_full_length() {
        let mut mock = MockTransport::new();
        mock.reply_raw(b"0123456789");
        let mut buf = [0u8; 4];

        assert_eq!(mock.call(HostFunction::Exec, b"", &mut buf), 10);
        assert_eq!(&buf, b"0123");
        assert_eq!(mock.recorded()[0].capacity, 4);
    }

    #[test]
    fn test_script_order() {
        let mut mock = MockTransport::new();
        mock.fail(-3).claim(5).reply_raw(b"ok");
        assert_eq!(mock.remaining(), 3);

        let mut buf = [0u8; 8];
        assert_eq!(mock.call(HostFunction::Exec, b"", &mut buf), -3);
        assert_eq!(mock.call(HostFunction::Exec, b"", &mut buf), 5);
        assert_eq!(mock.call(HostFunction::Exec, b"", &mut buf), 2);
        assert_eq!(mock.remaining(), 0);
    }

    #[test]
    fn test_records_notifications_separately() {
        let mut mock = MockTransport::new();
        mock.notify(HostFunction::Log, 3, b"boom");

        assert_eq!(mock.call_count(), 0);
        let notes = mock.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].code, 3);
        assert_eq!(notes[0].payload, b"boom");
    }
}
