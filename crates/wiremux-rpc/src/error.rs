/// Errors that can occur while encoding or parsing RPC frames.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Value codec failure inside the frame body.
    #[error("codec error: {0}")]
    Codec(#[from] wiremux_value::CodecError),

    /// Buffer-level framing error.
    #[error("buffer error: {0}")]
    Buffer(#[from] wiremux_buffer::BufferError),

    /// The frame's leading byte named no known message kind.
    #[error("unknown rpc message kind {0}")]
    UnknownKind(u8),

    /// Bytes were left over after the frame body was parsed.
    #[error("{0} trailing bytes after rpc frame")]
    TrailingBytes(usize),
}

pub type Result<T> = std::result::Result<T, RpcError>;
