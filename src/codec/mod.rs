//! Codec module - serialization/deserialization for bodies.
//!
//! - [`JsonCodec`] - compact JSON using `serde_json`
//!
//! # Design
//!
//! Codecs are implemented as marker structs with static methods rather than trait objects.
//! The codec carries no state; payload meaning belongs to the bridge and the envelope.
//!
//! # Example
//!
//! ```
//! use modwire::codec::JsonCodec;
//!
//! let encoded = JsonCodec::encode(&"hello").unwrap();
//! let decoded: String = JsonCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, "hello");
//! ```

mod json;

pub use json::JsonCodec;
