//! Envelope module - the stdin/stdout framing every module implements.
//!
//! One process handles exactly one request:
//!
//! 1. Read one header line from stdin
//! 2. If `opts` holds the documentation token, write the [`Descriptor`]
//! 3. Otherwise run the [`Module`] and write its result mapping
//!
//! Exactly one JSON line is written to stdout. A missing or invalid header
//! writes nothing and exits non-zero; an [`ApplicationError`] is a normal
//! payload and exits 0.
//!
//! # Example
//!
//! ```
//! use modwire::envelope::{Envelope, Header, Module, Outcome};
//! use modwire::descriptor::Descriptor;
//! use serde_json::{json, Map};
//!
//! struct Echo;
//!
//! impl Module for Echo {
//!     fn descriptor(&self) -> Descriptor {
//!         Descriptor::new("echo", "0.1.0")
//!     }
//!
//!     fn run(&mut self, header: &Header) -> Outcome {
//!         Ok(header.args.clone().into_inner())
//!     }
//! }
//!
//! let mut out = Vec::new();
//! Envelope::new(Echo)
//!     .serve(&b"{\"opts\":[],\"args\":{\"a\":1}}\n"[..], &mut out)
//!     .unwrap();
//! assert_eq!(out, b"{\"a\":1}\n");
//! ```

mod header;
mod outcome;
mod stdio;

use std::io::{BufRead, Write};
use std::process::ExitCode;

use serde_json::Value;

pub use header::{Args, Header};
pub use outcome::{ApplicationError, Module, Outcome};
pub use stdio::{write_json_line, write_line};

use crate::config::EnvelopeConfig;
use crate::descriptor::Descriptor;
use crate::error::Result;

/// Which terminal state a header leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Write the module descriptor.
    Describe,
    /// Run the module.
    Execute,
}

/// Serves one [`Module`] over the standard streams.
pub struct Envelope<M: Module> {
    module: M,
    config: EnvelopeConfig,
}

impl<M: Module> Envelope<M> {
    /// Create an envelope with the default configuration.
    pub fn new(module: M) -> Self {
        Self::with_config(module, EnvelopeConfig::default())
    }

    /// Create an envelope with configuration read from the environment.
    pub fn from_env(module: M) -> Self {
        Self::with_config(module, EnvelopeConfig::from_env())
    }

    /// Create an envelope with explicit configuration.
    pub fn with_config(module: M, config: EnvelopeConfig) -> Self {
        Self { module, config }
    }

    /// Token that selects documentation mode.
    pub fn doc_token(&self) -> &str {
        &self.config.doc_token
    }

    /// Borrow the module.
    pub fn module(&self) -> &M {
        &self.module
    }

    /// The module's descriptor.
    pub fn descriptor(&self) -> Descriptor {
        self.module.descriptor()
    }

    /// Decide the terminal state for a header. `args` plays no part.
    pub fn dispatch(&self, header: &Header) -> Dispatch {
        if header.has_opt(self.doc_token()) {
            Dispatch::Describe
        } else {
            Dispatch::Execute
        }
    }

    /// Produce the response payload for a header.
    pub fn respond(&mut self, header: &Header) -> Value {
        match self.dispatch(header) {
            Dispatch::Describe => self.module.descriptor().to_value(),
            Dispatch::Execute => match self.module.run(header) {
                Ok(result) => Value::Object(result),
                Err(err) => {
                    tracing::debug!(error = %err, "module returned an application error");
                    Value::Object(err.into_payload())
                }
            },
        }
    }

    /// Handle one request: read a header from `input`, write one line to
    /// `output`.
    ///
    /// # Errors
    ///
    /// Header errors are returned before anything is written. Encoding and
    /// write errors are returned as they occur.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<Dispatch> {
        let header = Header::read_from(input)?;
        let dispatch = self.dispatch(&header);
        tracing::debug!(?dispatch, opts = ?header.opts, "handling invocation");

        let payload = self.respond(&header);
        write_json_line(&mut output, &payload)?;
        Ok(dispatch)
    }

    /// Serve on the process's stdin and stdout.
    ///
    /// Failures are reported on stderr and turned into a non-zero exit code.
    pub fn run(mut self) -> ExitCode {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        match self.serve(stdin.lock(), stdout.lock()) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        }
    }
}
