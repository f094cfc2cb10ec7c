//! Demo module: run `uname` through the host bridge.

use std::process::ExitCode;

use modwire::bridge::{connect, Command, Level};
use modwire::descriptor::{Descriptor, ReturnsDoc};
use modwire::envelope::{Envelope, Header, Module, Outcome};
use modwire::{host_log, logging};
use serde_json::{json, Map, Value};

struct Uname;

impl Module for Uname {
    fn descriptor(&self) -> Descriptor {
        Descriptor::new("uname", env!("CARGO_PKG_VERSION"))
            .author("modwire")
            .description("Asks the host to run uname and returns its output.")
            .option("all", "Pass -a to uname")
            .example("Kernel name", r#"{ "args": {} }"#)
            .example("Everything", r#"{ "opts": ["all"], "args": {} }"#)
            .returns(ReturnsDoc::new("Output of uname.").data(json!({"output": "Linux"})))
    }

    fn run(&mut self, header: &Header) -> Outcome {
        let mut bridge = connect();
        let mut command = Command::new("uname");
        if header.has_opt("all") {
            command = command.arg("-a");
        }

        let stdout = bridge.exec(&command)?;
        host_log!(bridge, Level::Debug, "uname returned {} bytes", stdout.len());

        let mut out = Map::new();
        out.insert("output".to_string(), Value::String(stdout.trim_end().to_string()));
        Ok(out)
    }
}

fn main() -> ExitCode {
    logging::init_from_env();
    Envelope::from_env(Uname).run()
}
