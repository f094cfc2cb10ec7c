//! The `exec` call kind.
//!
//! Request: `{"argv": [string, ...], "cwd"?: string}`
//! Response: `{"exit_code": int, "stdout": string, "stderr": string}`

use serde::{Deserialize, Serialize};

use crate::error::{ModwireError, Result};

/// Wire form of an `exec` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Executable followed by its arguments. Never empty.
    pub argv: Vec<String>,
    /// Working directory; omitted from the wire when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

/// Wire form of an `exec` response, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Process exit code.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// True if the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout on success, [`ModwireError::RemoteExitNonZero`] otherwise.
    ///
    /// The error keeps stdout, stderr and the exit code verbatim.
    pub fn into_stdout(self) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(ModwireError::RemoteExitNonZero {
                exit_code: self.exit_code,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/// Builder for a host command.
///
/// ```
/// use modwire::bridge::Command;
///
/// let cmd = Command::new("/usr/bin/uname").arg("-a").current_dir("/");
/// let req = cmd.request().unwrap();
/// assert_eq!(req.argv, vec!["/usr/bin/uname", "-a"]);
/// assert_eq!(req.cwd.as_deref(), Some("/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: Vec<String>,
    cwd: Option<String>,
}

impl Command {
    /// Start a command for the given executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            argv: vec![program.into()],
            cwd: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory. An empty string clears it.
    pub fn current_dir(mut self, dir: impl Into<String>) -> Self {
        let dir = dir.into();
        self.cwd = if dir.is_empty() { None } else { Some(dir) };
        self
    }

    /// The executable.
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Build the wire request.
    ///
    /// # Errors
    ///
    /// Returns [`ModwireError::EmptyArgv`] if the executable is empty.
    pub fn request(&self) -> Result<CommandRequest> {
        if self.program().trim().is_empty() {
            return Err(ModwireError::EmptyArgv);
        }
        Ok(CommandRequest {
            argv: self.argv.clone(),
            cwd: self.cwd.clone(),
        })
    }
}
