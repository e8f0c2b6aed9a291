//! Tag-dispatched serialization of dynamically typed values.
//!
//! Every value is stored on the wire as a u32 tag followed by a tag-specific
//! payload. The codec ships five built-in tags (JSON fallback, raw bytes,
//! array, absent, record) and accepts caller-registered extensions; encoder
//! selection scans registrations newest-first, so extensions always take
//! precedence over the JSON fallback.

pub mod codec;
pub mod error;
pub mod value;

pub use codec::{tags, ValueCodec};
pub use error::{CodecError, Result};
pub use value::{Record, Value};
