/// Errors that can occur while reading wire buffers.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// A read ran past the end of the buffer.
    #[error("buffer exhausted ({needed} bytes needed, {remaining} remaining)")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A varint length did not terminate within 32 bits.
    #[error("varint length exceeds 32 bits")]
    VarintOverflow,

    /// A string field contained invalid UTF-8.
    #[error("invalid utf-8 in string field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, BufferError>;
