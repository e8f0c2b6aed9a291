use std::fmt::Write as _;

use bytes::Bytes;
use tracing::debug;
use wiremux_buffer::{ReadBuffer, WriteBuffer};
use wiremux_value::{Value, ValueCodec};

use crate::error::{Result, RpcError};
use crate::remote_error::RemoteError;

/// RPC frame kind bytes.
pub mod kind {
    pub const REQUEST: u8 = 1;
    pub const NOTIFICATION: u8 = 2;
    pub const REPLY: u8 = 3;
    pub const REPLY_ERROR: u8 = 4;
    pub const CANCEL: u8 = 5;
}

/// The error slot of a ReplyError frame.
///
/// Marker records rehydrate into [`RemoteError`]; any other value stays
/// opaque application data.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    Remote(RemoteError),
    Value(Value),
}

impl ErrorPayload {
    fn to_value(&self) -> Value {
        match self {
            ErrorPayload::Remote(err) => err.to_value(),
            ErrorPayload::Value(value) => value.clone(),
        }
    }

    fn from_value(value: Value) -> Self {
        match RemoteError::from_value(&value) {
            Some(err) => ErrorPayload::Remote(err),
            None => ErrorPayload::Value(value),
        }
    }
}

/// One RPC message, framed as `kind:u8 | id:u32be | body`.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcMessage {
    Request {
        id: u32,
        method: String,
        args: Vec<Value>,
    },
    Notification {
        id: u32,
        method: String,
        args: Vec<Value>,
    },
    Reply {
        id: u32,
        result: Value,
    },
    ReplyError {
        id: u32,
        error: ErrorPayload,
    },
    Cancel {
        id: u32,
    },
}

impl RpcMessage {
    /// The call id this message belongs to.
    pub fn id(&self) -> u32 {
        match self {
            RpcMessage::Request { id, .. }
            | RpcMessage::Notification { id, .. }
            | RpcMessage::Reply { id, .. }
            | RpcMessage::ReplyError { id, .. }
            | RpcMessage::Cancel { id } => *id,
        }
    }

    /// The kind byte leading this message's frame.
    pub fn kind_byte(&self) -> u8 {
        match self {
            RpcMessage::Request { .. } => kind::REQUEST,
            RpcMessage::Notification { .. } => kind::NOTIFICATION,
            RpcMessage::Reply { .. } => kind::REPLY,
            RpcMessage::ReplyError { .. } => kind::REPLY_ERROR,
            RpcMessage::Cancel { .. } => kind::CANCEL,
        }
    }

    /// Encode this message into `buf`.
    pub fn encode(&self, codec: &ValueCodec, buf: &mut WriteBuffer) -> Result<()> {
        buf.write_u8(self.kind_byte()).write_u32(self.id());
        match self {
            RpcMessage::Request { method, args, .. }
            | RpcMessage::Notification { method, args, .. } => {
                buf.write_str(method);
                codec.encode_array(buf, args)?;
            }
            RpcMessage::Reply { result, .. } => {
                codec.encode(buf, result)?;
            }
            RpcMessage::ReplyError { error, .. } => {
                codec.encode(buf, &error.to_value())?;
            }
            RpcMessage::Cancel { .. } => {}
        }
        Ok(())
    }

    /// Parse one complete frame.
    ///
    /// The frame must be consumed exactly; unknown kinds and truncation are
    /// surfaced to the caller with the raw buffer logged for diagnosis.
    pub fn decode(codec: &ValueCodec, frame: Bytes) -> Result<Self> {
        let mut buf = ReadBuffer::new(frame.clone());
        match Self::decode_from(codec, &mut buf) {
            Ok(message) if buf.is_empty() => Ok(message),
            Ok(_) => {
                debug!(frame = %hex_preview(&frame), "rpc frame has trailing bytes");
                Err(RpcError::TrailingBytes(buf.remaining()))
            }
            Err(err) => {
                debug!(frame = %hex_preview(&frame), %err, "failed to parse rpc frame");
                Err(err)
            }
        }
    }

    fn decode_from(codec: &ValueCodec, buf: &mut ReadBuffer) -> Result<Self> {
        let kind_byte = buf.read_u8()?;
        let id = buf.read_u32()?;
        match kind_byte {
            kind::REQUEST => {
                let method = buf.read_str()?;
                let args = normalize_args(codec.decode_array(buf)?);
                Ok(RpcMessage::Request { id, method, args })
            }
            kind::NOTIFICATION => {
                let method = buf.read_str()?;
                let args = normalize_args(codec.decode_array(buf)?);
                Ok(RpcMessage::Notification { id, method, args })
            }
            kind::REPLY => Ok(RpcMessage::Reply {
                id,
                result: codec.decode(buf)?,
            }),
            kind::REPLY_ERROR => Ok(RpcMessage::ReplyError {
                id,
                error: ErrorPayload::from_value(codec.decode(buf)?),
            }),
            kind::CANCEL => Ok(RpcMessage::Cancel { id }),
            other => Err(RpcError::UnknownKind(other)),
        }
    }
}

/// Peers that distinguish "absent" from "null" send JSON null for missing
/// arguments; normalize those to the absent value.
fn normalize_args(args: Vec<Value>) -> Vec<Value> {
    args.into_iter()
        .map(|arg| if arg == Value::Null { Value::Absent } else { arg })
        .collect()
}

fn hex_preview(frame: &Bytes) -> String {
    const PREVIEW_LEN: usize = 64;
    let shown = &frame[..frame.len().min(PREVIEW_LEN)];
    let mut out = String::with_capacity(shown.len() * 2 + 16);
    for byte in shown {
        let _ = write!(out, "{byte:02x}");
    }
    if frame.len() > PREVIEW_LEN {
        let _ = write!(out, "… ({} bytes)", frame.len());
    }
    out
}
