//! Native emulation of the host runtime.
//!
//! Lets a module built for the host target run unmodified outside the
//! sandbox: `exec` requests are serviced with `std::process::Command`, and
//! log records are re-emitted as `tracing` events under the
//! `modwire::module` target.
//!
//! The emulation follows the host's side of the contract: it never writes
//! more than the declared capacity into the module's buffer and signals
//! [`status::CAPACITY_EXCEEDED`] instead.

use std::process::{Command, Stdio};

use super::{status, HostFunction, Transport};
use crate::bridge::{CommandOutput, CommandRequest, Level};
use crate::codec::JsonCodec;

/// Copy a response body into a module buffer, respecting its capacity.
///
/// Returns the number of bytes written, or [`status::CAPACITY_EXCEEDED`]
/// without touching `dest` if the body does not fit.
pub fn write_bounded(dest: &mut [u8], body: &[u8]) -> i32 {
    if body.len() > dest.len() || body.len() > i32::MAX as usize {
        return status::CAPACITY_EXCEEDED;
    }
    dest[..body.len()].copy_from_slice(body);
    body.len() as i32
}

/// Transport that runs commands and logs locally.
#[derive(Debug, Default, Clone)]
pub struct LocalHost;

impl LocalHost {
    /// Create the transport.
    pub fn new() -> Self {
        Self
    }

    /// Run a request to completion and capture its output.
    fn run(&self, request: &CommandRequest) -> Result<CommandOutput, i32> {
        let Some((program, args)) = request.argv.split_first() else {
            return Err(status::BAD_REQUEST);
        };
        if program.is_empty() {
            return Err(status::BAD_REQUEST);
        }

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        if let Some(cwd) = &request.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().map_err(|e| {
            tracing::warn!(program = %program, "failed to spawn command: {}", e);
            status::HOST_FAILURE
        })?;

        Ok(CommandOutput {
            // Killed by a signal: no code to report.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn exec(&self, request: &[u8], response: &mut [u8]) -> i32 {
        let request: CommandRequest = match JsonCodec::decode_raw(request) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("malformed exec request: {}", e);
                return status::BAD_REQUEST;
            }
        };

        let output = match self.run(&request) {
            Ok(o) => o,
            Err(code) => return code,
        };

        tracing::debug!(
            argv = ?request.argv,
            exit_code = output.exit_code,
            "exec completed"
        );

        match JsonCodec::encode(&output) {
            Ok(body) => write_bounded(response, &body),
            Err(_) => status::HOST_FAILURE,
        }
    }
}

impl Transport for LocalHost {
    fn call(&mut self, function: HostFunction, request: &[u8], response: &mut [u8]) -> i32 {
        match function {
            HostFunction::Exec => self.exec(request, response),
            HostFunction::Log => status::UNSUPPORTED,
        }
    }

    fn notify(&mut self, function: HostFunction, code: i32, payload: &[u8]) {
        if function != HostFunction::Log {
            return;
        }
        let message = String::from_utf8_lossy(payload);
        match Level::from(code) {
            Level::Debug => tracing::debug!(target: "modwire::module", "{}", message),
            Level::Info => tracing::info!(target: "modwire::module", "{}", message),
            Level::Warn => tracing::warn!(target: "modwire::module", "{}", message),
            Level::Error => tracing::error!(target: "modwire::module", "{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec_raw(host: &mut LocalHost, request: &[u8], capacity: usize) -> (i32, Vec<u8>) {
        let mut out = vec![0u8; capacity];
        let n = host.call(HostFunction::Exec, request, &mut out);
        (n, out)
    }

    #[test]
    fn test_host_is_a_unit_value() {
        assert_eq!(std::mem::size_of::<LocalHost>(), 0);
        let mut host = LocalHost;
        let mut buf = [0u8; 8];
        assert_eq!(host.call(HostFunction::Log, b"", &mut buf), status::UNSUPPORTED);
    }

    #[test]
    fn test_write_bounded_fits() {
        let mut dest = [0u8; 8];
        assert_eq!(write_bounded(&mut dest, b"abc"), 3);
        assert_eq!(&dest[..3], b"abc");
    }

    #[test]
    fn test_write_bounded_refuses_overflow() {
        let mut dest = [0u8; 2];
        assert_eq!(write_bounded(&mut dest, b"abc"), status::CAPACITY_EXCEEDED);
        assert_eq!(dest, [0, 0]);
    }

    #[test]
    fn test_malformed_request_is_bad_request() {
        let mut host = LocalHost::new();
        let (n, _) = exec_raw(&mut host, b"{not json", 64);
        assert_eq!(n, status::BAD_REQUEST);
    }

    #[test]
    fn test_empty_argv_is_bad_request() {
        let mut host = LocalHost::new();
        let (n, _) = exec_raw(&mut host, br#"{"argv":[]}"#, 64);
        assert_eq!(n, status::BAD_REQUEST);

        let (n, _) = exec_raw(&mut host, br#"{"argv":[""]}"#, 64);
        assert_eq!(n, status::BAD_REQUEST);
    }

    #[test]
    fn test_missing_program_is_host_failure() {
        let mut host = LocalHost::new();
        let (n, _) = exec_raw(&mut host, br#"{"argv":["/definitely/not/a/program"]}"#, 64);
        assert_eq!(n, status::HOST_FAILURE);
    }

    #[test]
    fn test_log_is_not_request_response() {
        let mut host = LocalHost::new();
        let mut out = [0u8; 4];
        assert_eq!(host.call(HostFunction::Log, b"x", &mut out), status::UNSUPPORTED);
    }

    #[test]
    fn test_notify_does_not_panic_on_any_level() {
        let mut host = LocalHost::new();
        for code in [-1, 0, 1, 2, 3, 42] {
            host.notify(HostFunction::Log, code, b"message");
        }
        host.notify(HostFunction::Log, 1, &[0xff, 0xfe]);
        host.notify(HostFunction::Exec, 1, b"ignored");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_captures_streams_and_code() {
        let mut host = LocalHost::new();
        let req = br#"{"argv":["sh","-c","printf out; printf err >&2; exit 3"]}"#;
        let (n, out) = exec_raw(&mut host, req, 1024);
        assert!(n > 0);

        let resp: CommandOutput = JsonCodec::decode(&out[..n as usize]).unwrap();
        assert_eq!(resp.exit_code, 3);
        assert_eq!(resp.stdout, "out");
        assert_eq!(resp.stderr, "err");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_honors_cwd() {
        let mut host = LocalHost::new();
        let req = br#"{"argv":["pwd"],"cwd":"/"}"#;
        let (n, out) = exec_raw(&mut host, req, 1024);
        let resp: CommandOutput = JsonCodec::decode(&out[..n as usize]).unwrap();
        assert_eq!(resp.exit_code, 0);
        assert_eq!(resp.stdout.trim(), "/");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_response_too_large_for_buffer() {
        let mut host = LocalHost::new();
        let req = br#"{"argv":["sh","-c","printf 0123456789012345678901234567890123456789"]}"#;
        let (n, out) = exec_raw(&mut host, req, 16);
        assert_eq!(n, status::CAPACITY_EXCEEDED);
        assert!(out.iter().all(|b| *b == 0));
    }
}
