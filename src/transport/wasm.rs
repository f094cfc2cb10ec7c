//! Host imports of a real host runtime.
//!
//! The host exposes its functions under the `api` import module:
//!
//! ```text
//! api.exec(req_ptr: u32, req_len: u32, out_ptr: u32, out_cap: u32) -> i32
//! api.log(level: i32, msg_ptr: u32, msg_len: u32)
//! ```
//!
//! Pointers are offsets into this module's own linear memory. On wasm32 a
//! `usize` address is exactly such an offset.

use super::{status, HostFunction, Transport};

#[link(wasm_import_module = "api")]
extern "C" {
    #[link_name = "exec"]
    fn api_exec(req_ptr: u32, req_len: u32, out_ptr: u32, out_cap: u32) -> i32;

    #[link_name = "log"]
    fn api_log(level: i32, msg_ptr: u32, msg_len: u32);
}

/// An offset/length pair into linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    offset: u32,
    len: u32,
}

impl Region {
    fn of(bytes: &[u8]) -> Self {
        Self {
            offset: bytes.as_ptr() as usize as u32,
            len: bytes.len() as u32,
        }
    }

    fn of_mut(bytes: &mut [u8]) -> Self {
        Self {
            offset: bytes.as_mut_ptr() as usize as u32,
            len: bytes.len() as u32,
        }
    }
}

/// Transport backed by the host runtime's `api` imports.
#[derive(Debug, Default, Clone, Copy)]
pub struct WasmHost;

impl WasmHost {
    /// Create the transport.
    pub fn new() -> Self {
        Self
    }
}

impl Transport for WasmHost {
    fn call(&mut self, function: HostFunction, request: &[u8], response: &mut [u8]) -> i32 {
        match function {
            HostFunction::Exec => {
                let req = Region::of(request);
                let out = Region::of_mut(response);
                // SAFETY: both regions point into buffers borrowed for the
                // whole call; the host writes at most `out.len` bytes.
                unsafe { api_exec(req.offset, req.len, out.offset, out.len) }
            }
            HostFunction::Log => status::UNSUPPORTED,
        }
    }

    fn notify(&mut self, function: HostFunction, code: i32, payload: &[u8]) {
        if let HostFunction::Log = function {
            let msg = Region::of(payload);
            // SAFETY: the payload is borrowed for the whole call and only read.
            unsafe { api_log(code, msg.offset, msg.len) }
        }
    }
}
