/// Errors that can occur on a frame pipe.
#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    /// The packet header contains an invalid magic number.
    #[error("invalid packet magic (expected 0x574D \"WM\")")]
    InvalidMagic,

    /// The frame exceeds the configured maximum size.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing packets.
    #[error("pipe I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete packet was received.
    #[error("connection closed (incomplete packet)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, PipeError>;
