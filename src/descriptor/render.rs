//! Plain-text manual page for a descriptor.
//!
//! Sections, in order: banner (name, version, author), description,
//! options, keyword arguments, usage examples, returns. Every section is
//! always present; an empty list renders as `(none)`.

use std::fmt;

use super::{ArgumentDoc, Descriptor, OptionDoc};
use crate::error::Result;

/// Display adapter rendering a [`Descriptor`] as a manual page.
pub struct ManualPage<'a>(pub &'a Descriptor);

impl fmt::Display for ManualPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.0;

        write!(f, "{}", doc.name)?;
        if !doc.version.is_empty() {
            write!(f, " {}", doc.version)?;
        }
        writeln!(f)?;
        if !doc.author.is_empty() {
            writeln!(f, "Author: {}", doc.author)?;
        }
        writeln!(f)?;

        writeln!(f, "Description:")?;
        write_block(f, &doc.description, 2)?;
        writeln!(f)?;

        writeln!(f, "Options:")?;
        write_options(f, &doc.options)?;

        writeln!(f, "Keyword arguments:")?;
        write_arguments(f, &doc.arguments)?;

        writeln!(f, "Usage examples:")?;
        if doc.examples.is_empty() {
            writeln!(f, "  (none)")?;
            writeln!(f)?;
        }
        for (i, ex) in doc.examples.iter().enumerate() {
            if ex.description.trim().is_empty() {
                writeln!(f, "  Example {}", i + 1)?;
            } else {
                let mut lines = ex.description.trim().lines();
                writeln!(f, "  {}. {}", i + 1, lines.next().unwrap_or_default())?;
                for line in lines {
                    writeln!(f, "     {}", line)?;
                }
            }
            // Code is reproduced verbatim, only indented.
            for line in ex.code.lines() {
                writeln!(f, "    {}", line)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Returns:")?;
        let ret = &doc.returns;
        write_block(f, &ret.description, 2)?;
        if let Some(code) = ret.retcode {
            writeln!(f, "  retcode: {}", code)?;
        }
        if let Some(msg) = &ret.message {
            writeln!(f, "  message: {}", msg)?;
        }
        let data = serde_json::to_string_pretty(&ret.data).map_err(|_| fmt::Error)?;
        for line in data.lines() {
            writeln!(f, "    {}", line)?;
        }
        Ok(())
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, text: &str, indent: usize) -> fmt::Result {
    let text = text.trim();
    if text.is_empty() {
        return writeln!(f, "{:indent$}(none)", "");
    }
    for line in text.lines() {
        writeln!(f, "{:indent$}{}", "", line)?;
    }
    Ok(())
}

fn write_options(f: &mut fmt::Formatter<'_>, options: &[OptionDoc]) -> fmt::Result {
    if options.is_empty() {
        writeln!(f, "  (none)")?;
        return writeln!(f);
    }
    for opt in options {
        writeln!(f, "  {}", opt.name)?;
        if !opt.description.trim().is_empty() {
            write_block(f, &opt.description, 4)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_arguments(f: &mut fmt::Formatter<'_>, arguments: &[ArgumentDoc]) -> fmt::Result {
    if arguments.is_empty() {
        writeln!(f, "  (none)")?;
        return writeln!(f);
    }
    let width = arguments.iter().map(|a| a.name.len()).max().unwrap_or(0);
    for arg in arguments {
        let ty = if arg.ty.is_empty() { "<any>" } else { arg.ty.as_str() };
        let mut meta = format!("type: {}", ty);
        if arg.required {
            meta.push_str(", required");
        } else if let Some(default) = &arg.default {
            meta.push_str(&format!(", default: {}", default));
        }
        writeln!(f, "  {:width$} ({})", arg.name, meta, width = width)?;
        if !arg.description.trim().is_empty() {
            write_block(f, &arg.description, 4)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// Render a descriptor as a manual page.
pub fn render(doc: &Descriptor) -> String {
    ManualPage(doc).to_string()
}

/// Decode a descriptor document and render it.
///
/// # Errors
///
/// Returns [`ModwireError::InvalidDescriptor`](crate::ModwireError::InvalidDescriptor)
/// if the text cannot be decoded.
pub fn render_json(text: &str) -> Result<String> {
    let doc = Descriptor::from_json(text)?;
    Ok(render(&doc))
}
