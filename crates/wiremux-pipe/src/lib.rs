//! Frame pipes: the transports underneath a multiplexer.
//!
//! A pipe delivers whole frames in order, one atomic packet per `commit`.
//! Packets are framed with a 2-byte magic ("WM") and a 4-byte big-endian
//! length; no partial frames ever reach the multiplexer.

pub mod codec;
pub mod driver;
pub mod error;
pub mod loopback;
pub mod reader;
pub mod writer;

#[cfg(unix)]
pub mod uds;

pub use codec::{decode_packet, encode_packet, PipeConfig, DEFAULT_MAX_FRAME, HEADER_SIZE, MAGIC};
pub use driver::pump;
pub use error::{PipeError, Result};
pub use loopback::{loopback, LoopbackPipe};
pub use reader::PacketReader;
pub use writer::{PacketWriter, SharedWriter};
