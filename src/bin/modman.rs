//! Render a module descriptor as a manual page.
//!
//! The descriptor comes from a file, from stdin, or from running a module
//! binary in documentation mode.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, Stdio};

use anyhow::{bail, Context, Result};
use clap::Parser;
use modwire::config::{EnvelopeConfig, LogConfig, DEFAULT_DOC_TOKEN};
use modwire::descriptor::{render, Descriptor};
use modwire::envelope::Header;
use modwire::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "modman",
    version,
    about = "Render a module descriptor as a manual page"
)]
struct Cli {
    /// Descriptor JSON file (reads stdin when omitted)
    #[arg(value_name = "FILE", conflicts_with = "module")]
    file: Option<PathBuf>,

    /// Run this module binary in documentation mode and render its answer
    #[arg(short, long, value_name = "PATH")]
    module: Option<PathBuf>,

    /// Token sent in `opts` to request documentation from `--module`
    #[arg(
        long,
        value_name = "TOKEN",
        env = "MODWIRE_DOC_TOKEN",
        default_value = DEFAULT_DOC_TOKEN
    )]
    doc_token: String,

    /// Print the decoded descriptor as pretty JSON instead of a page
    #[arg(long)]
    raw: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = init_logging(&LogConfig::from_env());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("modman: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let text = if let Some(path) = &cli.module {
        ask_module(path, &cli.doc_token)?
    } else if let Some(path) = &cli.file {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    } else {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        text
    };

    let doc = Descriptor::from_json(text.trim()).context("decoding descriptor")?;
    let page = if cli.raw {
        serde_json::to_string_pretty(&doc)? + "\n"
    } else {
        render(&doc)
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(page.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Invoke a module with the documentation header and return its output line.
fn ask_module(path: &Path, token: &str) -> Result<String> {
    let config = EnvelopeConfig::new().doc_token(token);
    let header = Header {
        opts: vec![config.doc_token],
        ..Header::default()
    };
    let line = serde_json::to_string(&header)? + "\n";
    tracing::debug!(module = %path.display(), header = %line.trim_end(), "requesting descriptor");

    let mut child = Command::new(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("starting {}", path.display()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(line.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        bail!("{} exited with {}", path.display(), output.status);
    }
    let stdout = String::from_utf8(output.stdout).context("module output is not UTF-8")?;
    Ok(stdout)
}
