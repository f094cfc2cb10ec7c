//! Integration tests for modwire.
//!
//! These tests drive the bridge and the envelope together through the
//! public API only.

use modwire::bridge::{Command, CommandRequest, HostBridge, Level};
use modwire::envelope::{Envelope, Header, Module, Outcome};
use modwire::testing::{MockTransport, RecordedKind};
use modwire::transport::{status, HostFunction};
use modwire::{host_log, ApplicationError, Descriptor, ModwireError};
use serde_json::{json, Map, Value};

/// Module that shells out through whatever bridge it is given.
struct Runner {
    bridge: HostBridge<MockTransport>,
}

impl Module for Runner {
    fn descriptor(&self) -> Descriptor {
        Descriptor::new("runner", "0.0.1")
    }

    fn run(&mut self, header: &Header) -> Outcome {
        let argv = header
            .args
            .get_str_list("argv")
            .ok_or_else(|| ApplicationError::new("argv is required"))?;
        let mut argv = argv.into_iter();
        let program = argv.next().unwrap_or_default();
        let stdout = self.bridge.exec(&Command::new(program).args(argv))?;
        host_log!(self.bridge, Level::Info, "ran ok");

        let mut out = Map::new();
        out.insert("stdout".to_string(), Value::String(stdout));
        Ok(out)
    }
}

fn serve(mock: MockTransport, input: &str) -> Value {
    let mut env = Envelope::new(Runner {
        bridge: HostBridge::new(mock),
    });
    let mut out = Vec::new();
    env.serve(input.as_bytes(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches('\n').count(), 1, "exactly one output line");
    serde_json::from_str(text.trim_end()).unwrap()
}

#[test]
fn test_exec_result_flows_to_output() {
    let mut mock = MockTransport::new();
    mock.reply_json(&json!({"exit_code": 0, "stdout": "Linux", "stderr": ""}));

    let value = serve(mock, r#"{"opts":[],"args":{"argv":["uname","-s"]}}"#);
    assert_eq!(value, json!({"stdout": "Linux"}));
}

#[test]
fn test_remote_failure_becomes_inspectable_payload() {
    let mut mock = MockTransport::new();
    mock.reply_json(&json!({"exit_code": 3, "stdout": "half", "stderr": "denied"}));

    let value = serve(mock, r#"{"args":{"argv":"false"}}"#);
    assert_eq!(value["error"], "command exited non-zero");
    assert_eq!(value["exit_code"], 3);
    assert_eq!(value["stdout"], "half");
    assert_eq!(value["stderr"], "denied");
}

#[test]
fn test_transport_failure_is_not_a_remote_exit() {
    let mut mock = MockTransport::new();
    mock.fail(status::HOST_FAILURE);

    let value = serve(mock, r#"{"args":{"argv":"true"}}"#);
    assert_eq!(value["error"], "host call failed");
    assert!(value.get("exit_code").is_none());
}

#[test]
fn test_documentation_mode_skips_host_calls() {
    // Nothing scripted: any exec would fail.
    let value = serve(MockTransport::new(), r#"{"opts":["man"],"args":{"argv":"x"}}"#);
    assert_eq!(value["name"], "runner");
    assert_eq!(value["version"], "0.0.1");
}

#[test]
fn test_bridge_request_wire_shape() {
    let mut mock = MockTransport::new();
    mock.reply_json(&json!({"exit_code": 0, "stdout": "", "stderr": ""}));
    let mut bridge = HostBridge::with_capacity(mock, 1024);

    bridge
        .exec(&Command::new("ls").arg("-l").current_dir("/tmp"))
        .unwrap();
    bridge.warn("careful");

    let transport = bridge.into_transport();
    let recorded = transport.recorded();
    assert_eq!(recorded.len(), 2);

    assert_eq!(recorded[0].kind, RecordedKind::Call);
    assert_eq!(recorded[0].function, HostFunction::Exec);
    assert_eq!(recorded[0].capacity, 1024);
    let request: CommandRequest = serde_json::from_slice(&recorded[0].payload).unwrap();
    assert_eq!(request.argv, vec!["ls", "-l"]);
    assert_eq!(request.cwd.as_deref(), Some("/tmp"));

    assert_eq!(recorded[1].kind, RecordedKind::Notify);
    assert_eq!(recorded[1].function, HostFunction::Log);
    assert_eq!(recorded[1].code, Level::Warn.code());
    assert_eq!(recorded[1].payload, b"careful");
}

#[test]
fn test_overflow_is_reported_not_truncated() {
    let mut mock = MockTransport::new();
    mock.claim(4096);
    let mut bridge = HostBridge::with_capacity(mock, 64);

    let err = bridge.exec(&Command::new("cat")).unwrap_err();
    assert!(matches!(
        err,
        ModwireError::ResponseOverflow {
            written: 4096,
            capacity: 64,
            ..
        }
    ));
    assert!(err.is_transport());
}

#[cfg(unix)]
mod local_host {
    use modwire::bridge::{Command, HostBridge};
    use modwire::transport::LocalHost;
    use modwire::ModwireError;

    #[test]
    fn test_true_returns_empty_stdout() {
        let mut bridge = HostBridge::new(LocalHost::new());
        assert_eq!(bridge.exec(&Command::new("true")).unwrap(), "");
    }

    #[test]
    fn test_failing_command_preserves_output() {
        let mut bridge = HostBridge::new(LocalHost::new());
        let err = bridge
            .exec(&Command::new("sh").args(["-c", "echo out; echo err >&2; exit 4"]))
            .unwrap_err();

        match err {
            ModwireError::RemoteExitNonZero {
                exit_code,
                stdout,
                stderr,
            } => {
                assert_eq!(exit_code, 4);
                assert_eq!(stdout, "out\n");
                assert_eq!(stderr, "err\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program_is_a_transport_failure() {
        let mut bridge = HostBridge::new(LocalHost::new());
        let err = bridge
            .exec(&Command::new("/nonexistent/modwire-test-binary"))
            .unwrap_err();
        assert!(matches!(err, ModwireError::HostCallFailed { .. }));
    }
}
