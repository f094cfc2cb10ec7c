//! Demo module: look up keys in an os-release style file.
//!
//! ```text
//! $ echo '{"opts":[],"args":{"key":"VERSION_ID"}}' | osrelease
//! {"VERSION_ID":"12"}
//! ```

use std::collections::BTreeMap;
use std::process::ExitCode;

use modwire::descriptor::{ArgumentDoc, Descriptor, ReturnsDoc};
use modwire::envelope::{ApplicationError, Envelope, Header, Module, Outcome};
use modwire::logging;
use serde_json::{json, Map, Value};

const DEFAULT_KEY: &str = "VERSION";
const DEFAULT_FILE: &str = "/etc/os-release";

/// Parse `KEY=value` lines. Blank lines and `#` comments are skipped and
/// surrounding quotes are removed from values.
fn parse_os_release(text: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        out.insert(key.trim().to_string(), value.to_string());
    }
    out
}

struct OsRelease;

impl Module for OsRelease {
    fn descriptor(&self) -> Descriptor {
        Descriptor::new("osrelease", env!("CARGO_PKG_VERSION"))
            .author("modwire")
            .description("Returns values from an os-release style file.")
            .option("all", "Return every key instead of a single one")
            .argument(
                ArgumentDoc::new("key", "string")
                    .description("Key to look up")
                    .default_value(DEFAULT_KEY),
            )
            .argument(
                ArgumentDoc::new("file", "string")
                    .description("File to read")
                    .default_value(DEFAULT_FILE),
            )
            .example("Get the release version", r#"{ "args": { "key": "VERSION" } }"#)
            .example("Dump the whole file", r#"{ "opts": ["all"], "args": {} }"#)
            .example("Get module documentation", r#"{ "opts": ["man"], "args": {} }"#)
            .returns(
                ReturnsDoc::new("The requested key and its value.")
                    .data(json!({"VERSION": "12 (bookworm)"})),
            )
    }

    fn run(&mut self, header: &Header) -> Outcome {
        let file = header
            .args
            .get_str("file")
            .unwrap_or_else(|| DEFAULT_FILE.to_string());

        let text = std::fs::read_to_string(&file).map_err(|e| {
            ApplicationError::new(format!("failed to read {}", file)).detail(e.to_string())
        })?;
        let pairs = parse_os_release(&text);
        tracing::debug!(file = %file, keys = pairs.len(), "parsed os-release");

        if header.has_opt("all") {
            return Ok(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect());
        }

        let key = header
            .args
            .get_str("key")
            .unwrap_or_else(|| DEFAULT_KEY.to_string());
        match pairs.get(&key) {
            Some(value) => {
                let mut out = Map::new();
                out.insert(key, Value::String(value.clone()));
                Ok(out)
            }
            None => Err(ApplicationError::new("unknown os-release key").with("key", key)),
        }
    }
}

fn main() -> ExitCode {
    logging::init_from_env();
    Envelope::from_env(OsRelease).run()
}
