//! JSON codec using `serde_json`.
//!
//! Every body that crosses a boundary in modwire is JSON: the invocation
//! header and response on the standard streams, and the `exec` request and
//! response in linear memory. Output is always compact, so one encoded value
//! is always exactly one line.
//!
//! # Example
//!
//! ```
//! use modwire::codec::JsonCodec;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message {
//!     id: u32,
//!     content: String,
//! }
//!
//! let msg = Message { id: 42, content: "two\nlines".to_string() };
//! let line = JsonCodec::encode_line(&msg).unwrap();
//! assert!(!line.contains('\n'));
//! let decoded: Message = JsonCodec::decode(line.as_bytes()).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use crate::error::{ModwireError, Result};

/// JSON codec for structured bodies.
///
/// Marker struct with static methods, selected at compile time.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to compact JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Encode a value as a single JSON line, without the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`ModwireError::Protocol`] if the encoded text would span
    /// more than one line.
    pub fn encode_line<T: serde::Serialize>(value: &T) -> Result<String> {
        let line = serde_json::to_string(value)?;
        if line.contains('\n') {
            return Err(ModwireError::Protocol(
                "encoded payload contains a newline".to_string(),
            ));
        }
        Ok(line)
    }

    /// Decode JSON bytes to a value.
    ///
    /// Trailing whitespace is accepted, trailing data is not.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decode JSON bytes, returning the raw decoder error.
    ///
    /// Used where the caller classifies the failure itself.
    #[inline]
    pub fn decode_raw<T: serde::de::DeserializeOwned>(
        bytes: &[u8],
    ) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
