//! Invocation header: `{"opts": [string...], "args": {...}}`.

use std::io::BufRead;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModwireError, Result};

/// Keyword arguments of an invocation.
///
/// Typed accessors are forgiving about representation, the way
/// hand-written headers tend to need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(Map<String, Value>);

impl Args {
    /// Create empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check if a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all arguments.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    /// String value, trimmed. Blank strings count as absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Boolean value.
    ///
    /// Strings are true unless they are `""`, `"0"`, `"false"` or `"no"`;
    /// numbers are true unless zero.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => {
                let s = s.trim().to_lowercase();
                Some(!matches!(s.as_str(), "" | "0" | "false" | "no"))
            }
            Value::Number(n) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
            _ => None,
        }
    }

    /// Integer value, from a JSON integer or a numeric string.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// List of strings, from a JSON array or a comma-separated string.
    pub fn get_str_list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            Value::String(s) => Some(
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Args {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Parsed invocation header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Flag tokens, in order of appearance.
    #[serde(default, deserialize_with = "null_as_default")]
    pub opts: Vec<String>,
    /// Keyword arguments.
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: Args,
}

/// Treat an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Header {
    /// Parse a header from one line of JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModwireError::InvalidHeader`] if the line is not a header.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(ModwireError::InvalidHeader)
    }

    /// Read exactly one line and parse it as a header.
    ///
    /// Nothing past the first line is consumed.
    ///
    /// # Errors
    ///
    /// - [`ModwireError::MissingHeader`] if the input is empty
    /// - [`ModwireError::InvalidHeader`] if the line is not a header,
    ///   including a line that is not UTF-8
    /// - [`ModwireError::Io`] if reading fails
    pub fn read_from<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Err(ModwireError::MissingHeader);
        }
        serde_json::from_slice(&line).map_err(ModwireError::InvalidHeader)
    }

    /// Exact-match check for an option token.
    pub fn has_opt(&self, token: &str) -> bool {
        self.opts.iter().any(|o| o == token)
    }

    /// Option tokens with duplicates removed, first occurrence kept.
    pub fn options(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.opts.len());
        for opt in &self.opts {
            if !seen.contains(&opt.as_str()) {
                seen.push(opt);
            }
        }
        seen
    }
}
