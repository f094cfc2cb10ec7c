//! Descriptor module - a module's self-description.
//!
//! A [`Descriptor`] is pure data, built fresh for each documentation request
//! and serialized once. Field names are fixed; an external renderer depends
//! on them, on `arguments[].required` being a boolean, and on
//! `returns.data` always being an object.
//!
//! Decoding is lenient in the places hand-written descriptors tend to vary:
//! list fields accept `[]`, `{}` or `null`, and `returns.data` also accepts
//! the key `sample`.
//!
//! # Example
//!
//! ```
//! use modwire::descriptor::{ArgumentDoc, Descriptor, ReturnsDoc};
//! use serde_json::json;
//!
//! let doc = Descriptor::new("osrelease", "0.1.0")
//!     .author("ops")
//!     .description("Reads a key from /etc/os-release.")
//!     .argument(ArgumentDoc::new("key", "string").required(true).description("Key to read"))
//!     .example("Read VERSION", r#"{ "args": { "key": "VERSION" } }"#)
//!     .returns(ReturnsDoc::new("The key and its value").data(json!({"VERSION": "12"})));
//!
//! let value = serde_json::to_value(&doc).unwrap();
//! assert_eq!(value["arguments"][0]["required"], true);
//! assert!(value["returns"]["data"].is_object());
//! ```

mod render;

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use render::{render, render_json, ManualPage};

/// A documented option token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDoc {
    /// Token as it appears in `opts`.
    pub name: String,
    /// What the option does.
    #[serde(default)]
    pub description: String,
}

/// A documented keyword argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDoc {
    /// Key in `args`.
    pub name: String,
    /// Type name, free-form (`string`, `int`, `bool`, ...).
    #[serde(rename = "type", default)]
    pub ty: String,
    /// Whether the argument must be present.
    #[serde(default)]
    pub required: bool,
    /// What the argument does.
    #[serde(default)]
    pub description: String,
    /// Default value, shown when the argument is optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ArgumentDoc {
    /// Create an optional argument of the given type.
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            required: false,
            description: String::new(),
            default: None,
        }
    }

    /// Mark the argument as required or optional.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }
}

/// A usage example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleDoc {
    /// What the example shows.
    #[serde(default)]
    pub description: String,
    /// Invocation text, rendered verbatim.
    pub code: String,
}

/// Shape of the data a module returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnsDoc {
    /// What is returned.
    #[serde(default)]
    pub description: String,
    /// Return code, if the module documents one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retcode: Option<i64>,
    /// Return message, if the module documents one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Sample of the returned mapping. Never null.
    #[serde(default, alias = "sample", deserialize_with = "object_or_null")]
    pub data: Map<String, Value>,
}

impl ReturnsDoc {
    /// Create with a description.
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Self::default()
        }
    }

    /// Set the return code.
    pub fn retcode(mut self, retcode: i64) -> Self {
        self.retcode = Some(retcode);
        self
    }

    /// Set the return message.
    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Set the sample data. Anything but an object is stored under `"value"`.
    pub fn data(mut self, data: Value) -> Self {
        self.data = match data {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self
    }
}

/// A module's self-description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Module name.
    pub name: String,
    /// Module version.
    #[serde(default)]
    pub version: String,
    /// Author.
    #[serde(default)]
    pub author: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Option tokens.
    #[serde(default, deserialize_with = "lenient_list")]
    pub options: Vec<OptionDoc>,
    /// Keyword arguments.
    #[serde(default, deserialize_with = "lenient_list")]
    pub arguments: Vec<ArgumentDoc>,
    /// Usage examples.
    #[serde(default, deserialize_with = "lenient_list")]
    pub examples: Vec<ExampleDoc>,
    /// Returned data.
    #[serde(default, deserialize_with = "returns_or_null")]
    pub returns: ReturnsDoc,
}

impl Descriptor {
    /// Create a descriptor with a name and version.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            author: String::new(),
            description: String::new(),
            options: Vec::new(),
            arguments: Vec::new(),
            examples: Vec::new(),
            returns: ReturnsDoc::default(),
        }
    }

    /// Set the author.
    pub fn author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Add an option token.
    pub fn option(mut self, name: &str, description: &str) -> Self {
        self.options.push(OptionDoc {
            name: name.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// Add a keyword argument.
    pub fn argument(mut self, argument: ArgumentDoc) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Add a usage example.
    pub fn example(mut self, description: &str, code: &str) -> Self {
        self.examples.push(ExampleDoc {
            description: description.to_string(),
            code: code.to_string(),
        });
        self
    }

    /// Set the returns section.
    pub fn returns(mut self, returns: ReturnsDoc) -> Self {
        self.returns = returns;
        self
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> Value {
        // Plain data with string keys: serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Decode a descriptor document.
    ///
    /// # Errors
    ///
    /// Returns [`ModwireError::InvalidDescriptor`](crate::ModwireError::InvalidDescriptor)
    /// if the text is not a descriptor.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        serde_json::from_str(text).map_err(crate::ModwireError::InvalidDescriptor)
    }
}

/// Accept `[...]`, `{}` or `null` for a list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect(),
        Value::Object(obj) if obj.is_empty() => Ok(Vec::new()),
        Value::Null => Ok(Vec::new()),
        other => Err(D::Error::custom(format!(
            "expected array ([]) or empty object ({{}}), got {other}"
        ))),
    }
}

fn object_or_null<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(D::Error::custom(format!("expected object, got {other}"))),
    }
}

fn returns_or_null<'de, D>(deserializer: D) -> Result<ReturnsDoc, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<ReturnsDoc>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Descriptor {
        Descriptor::new("hello", "0.1.0")
            .author("ops")
            .description("Says hello.")
            .option("quiet", "Print nothing")
            .argument(ArgumentDoc::new("name", "string").required(true).description("Who"))
            .example("Greet", r#"{ "args": { "name": "x" } }"#)
            .returns(ReturnsDoc::new("A greeting").data(json!({"output": "hello, x"})))
    }

    #[test]
    fn test_field_names_and_order() {
        let text = serde_json::to_string(&sample()).unwrap();
        let keys = [
            "\"name\"",
            "\"version\"",
            "\"author\"",
            "\"description\"",
            "\"options\"",
            "\"arguments\"",
            "\"examples\"",
            "\"returns\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_argument_shape() {
        let value = sample().to_value();
        let arg = &value["arguments"][0];
        assert_eq!(arg["name"], "name");
        assert_eq!(arg["type"], "string");
        assert_eq!(arg["required"], json!(true));
        assert!(arg.get("default").is_none());
    }

    #[test]
    fn test_returns_data_never_null() {
        let value = Descriptor::new("x", "1").to_value();
        assert_eq!(value["returns"]["data"], json!({}));
        assert!(value["returns"].get("retcode").is_none());
        assert!(value["returns"].get("message").is_none());
    }

    #[test]
    fn test_returns_retcode_and_message() {
        let value = Descriptor::new("x", "1")
            .returns(ReturnsDoc::new("d").retcode(0).message("done"))
            .to_value();
        assert_eq!(value["returns"]["retcode"], 0);
        assert_eq!(value["returns"]["message"], "done");
    }

    #[test]
    fn test_returns_non_object_data_is_wrapped() {
        let r = ReturnsDoc::new("d").data(json!([1, 2]));
        assert_eq!(r.data["value"], json!([1, 2]));
        assert!(ReturnsDoc::new("d").data(Value::Null).data.is_empty());
    }

    #[test]
    fn test_decode_round_trip() {
        let doc = sample();
        let text = serde_json::to_string(&doc).unwrap();
        assert_eq!(Descriptor::from_json(&text).unwrap(), doc);
    }

    #[test]
    fn test_decode_lenient_lists() {
        let doc = Descriptor::from_json(
            r#"{"name":"n","description":"d","options":{},"arguments":null,"examples":[]}"#,
        )
        .unwrap();
        assert!(doc.options.is_empty());
        assert!(doc.arguments.is_empty());
        assert!(doc.examples.is_empty());
        assert!(doc.returns.data.is_empty());
    }

    #[test]
    fn test_decode_sample_alias_and_null_data() {
        let doc = Descriptor::from_json(
            r#"{"name":"n","returns":{"description":"d","sample":{"output":"x"}}}"#,
        )
        .unwrap();
        assert_eq!(doc.returns.data["output"], "x");

        let doc = Descriptor::from_json(r#"{"name":"n","returns":{"data":null}}"#).unwrap();
        assert!(doc.returns.data.is_empty());

        let doc = Descriptor::from_json(r#"{"name":"n","returns":null}"#).unwrap();
        assert_eq!(doc.returns, ReturnsDoc::default());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Descriptor::from_json("[]").is_err());
        assert!(Descriptor::from_json(r#"{"description":"no name"}"#).is_err());
        assert!(Descriptor::from_json(r#"{"name":"n","options":"nope"}"#).is_err());
        assert!(Descriptor::from_json(r#"{"name":"n","arguments":[{"name":"a","required":"yes"}]}"#).is_err());
    }
}
