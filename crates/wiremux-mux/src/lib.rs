//! Multiplexes many named logical channels over one underlying frame pipe.
//!
//! Every pipe frame starts with a control opcode and a string channel id:
//! Open requests a channel, AckOpen confirms one we requested, Close tears
//! one down, Data carries payload for an established channel. The
//! multiplexer owns the channel tables; the transport driver feeds inbound
//! frames to [`Multiplexer::handle_frame`] and surfaces pipe lifecycle via
//! [`Multiplexer::handle_error`] / [`Multiplexer::handle_closed`].

pub mod channel;
pub mod error;
pub mod event;
pub mod header;
pub mod mux;

pub use channel::{Channel, DataBuffer};
pub use error::{MuxError, Result};
pub use event::{Signal, Subscription};
pub use header::{opcode, Header};
pub use mux::{FrameSink, MuxConfig, Multiplexer, OpenRequest};
