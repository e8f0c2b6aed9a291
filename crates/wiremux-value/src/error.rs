/// Errors that can occur while encoding or decoding typed values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Buffer-level framing error.
    #[error("buffer error: {0}")]
    Buffer(#[from] wiremux_buffer::BufferError),

    /// The wire carried a tag with no registered decoder.
    #[error("unknown value tag {0}")]
    UnknownTag(u32),

    /// A tag was registered twice.
    #[error("tag {0} already registered")]
    DuplicateTag(u32),

    /// A value reached the JSON fallback but is not JSON-representable.
    #[error("value is not JSON-representable: {0}")]
    NotJson(&'static str),

    /// JSON serialization or parsing failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
