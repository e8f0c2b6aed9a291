//! RPC message frames: a thin layer above the typed value codec.
//!
//! One frame is `kind:u8 | id:u32be | body`. Five kinds exist: Request and
//! Notification carry a method name and argument list, Reply carries one
//! result value, ReplyError carries one error value, Cancel carries nothing.

pub mod error;
pub mod message;
pub mod remote_error;

pub use error::{Result, RpcError};
pub use message::{kind, ErrorPayload, RpcMessage};
pub use remote_error::{RemoteError, ERROR_MARKER};
