//! Framed binary buffers for the wiremux RPC substrate.
//!
//! Every wire message is built from a handful of primitives:
//! - Fixed-width integers and doubles, big-endian
//! - Varint lengths (7-bit little-endian continuation encoding)
//! - UTF-8 strings prefixed with a 4-byte big-endian byte count
//! - Raw byte blobs prefixed with a varint byte count
//!
//! The string/blob length asymmetry (u32 prefix vs varint prefix) is a wire
//! compatibility requirement, not a stylistic choice.

pub mod error;
pub mod read;
pub mod write;

pub use error::{BufferError, Result};
pub use read::ReadBuffer;
pub use write::WriteBuffer;
