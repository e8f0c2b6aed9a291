/// Errors that can occur in multiplexer operations.
#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    /// Buffer-level framing error in a control frame.
    #[error("buffer error: {0}")]
    Buffer(#[from] wiremux_buffer::BufferError),

    /// A pipe frame began with an opcode outside the control set.
    #[error("unknown mux opcode {0}")]
    UnknownOpcode(u8),

    /// AckOpen arrived for a channel id with no pending open.
    #[error("ack-open for channel '{0}' with no pending open")]
    UnexpectedAck(String),

    /// A channel id was opened while already pending or open.
    #[error("channel '{0}' already pending or open")]
    DuplicateChannel(String),

    /// The pipe closed before a pending open resolved.
    #[error("open of channel '{0}' aborted by pipe closure")]
    OpenAborted(String),

    /// A pending open did not resolve within the caller's deadline.
    #[error("open timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The underlying pipe failed.
    #[error("pipe error: {0}")]
    Pipe(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MuxError>;
