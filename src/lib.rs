//! # modwire
//!
//! Module-side SDK for sandboxed compute modules.
//!
//! A module runs with no ambient access to the operating system. It asks
//! the host for privileged work through a narrow call bridge, and talks to
//! whatever launched it through a one-line JSON envelope.
//!
//! ## Architecture
//!
//! - **Transport** (linear memory): `(ptr, len)` request in, bounded
//!   response buffer out, negative status on failure
//! - **Bridge**: typed `exec` and `log` host calls on top of the transport
//! - **Envelope** (stdio): one header line in, one JSON line out
//! - **Descriptor**: structured self-documentation and its renderer
//!
//! ## Example
//!
//! ```ignore
//! use modwire::bridge::{connect, Command};
//! use modwire::envelope::{Envelope, Header, Module, Outcome};
//! use modwire::Descriptor;
//!
//! struct Uname;
//!
//! impl Module for Uname {
//!     fn descriptor(&self) -> Descriptor {
//!         Descriptor::new("uname", "0.1.0")
//!     }
//!
//!     fn run(&mut self, _header: &Header) -> Outcome {
//!         let out = connect().exec(&Command::new("uname").arg("-a"))?;
//!         let mut result = serde_json::Map::new();
//!         result.insert("output".into(), out.into());
//!         Ok(result)
//!     }
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     Envelope::from_env(Uname).run()
//! }
//! ```

pub mod bridge;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod testing;
pub mod transport;

pub use bridge::{connect, HostBridge};
pub use descriptor::Descriptor;
pub use envelope::{ApplicationError, Envelope, Header, Module, Outcome};
pub use error::{ModwireError, Result};
