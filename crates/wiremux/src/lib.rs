//! Transport-agnostic RPC lower half.
//!
//! wiremux multiplexes many named request/response and notification streams
//! over a single bidirectional pipe, with a self-describing binary format
//! for structured values.
//!
//! # Crate Structure
//!
//! - [`buffer`] — Framed binary buffers (varint, lenstr, fixed-width)
//! - [`value`] — Tag-dispatched typed value codec with extensible registries
//! - [`rpc`] — RPC message frames above the codec
//! - [`mux`] — Logical-channel multiplexer over one frame pipe
//! - [`pipe`] — Packet transports: streams, Unix sockets, loopback

/// Re-export buffer types.
pub mod buffer {
    pub use wiremux_buffer::*;
}

/// Re-export typed value codec types.
pub mod value {
    pub use wiremux_value::*;
}

/// Re-export RPC frame types.
pub mod rpc {
    pub use wiremux_rpc::*;
}

/// Re-export multiplexer types.
pub mod mux {
    pub use wiremux_mux::*;
}

/// Re-export pipe transports.
pub mod pipe {
    pub use wiremux_pipe::*;
}
