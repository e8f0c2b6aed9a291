use std::collections::HashMap;

use wiremux_buffer::{ReadBuffer, WriteBuffer};

use crate::error::{CodecError, Result};
use crate::value::{Record, Value};

/// Reserved wire tags.
///
/// Extensions must choose tags outside this range; the registry rejects
/// collisions at registration time.
pub mod tags {
    /// String-encoded JSON of the value (universal fallback).
    pub const JSON: u32 = 0;
    /// Raw byte array, varint length prefix.
    pub const BYTES: u32 = 1;
    /// Heterogeneous array, u32 count prefix.
    pub const ARRAY: u32 = 2;
    /// The absent value, no payload.
    pub const ABSENT: u32 = 3;
    /// Record, u32 field-count prefix of (key, value) pairs.
    pub const RECORD: u32 = 4;
}

/// Selects the values an encoder claims.
pub type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;
/// Writes one claimed value's payload; recurses through the codec.
pub type Writer = Box<dyn Fn(&ValueCodec, &mut WriteBuffer, &Value) -> Result<()> + Send + Sync>;
/// Reads one tag's payload back into a value; recurses through the codec.
pub type Reader = Box<dyn Fn(&ValueCodec, &mut ReadBuffer) -> Result<Value> + Send + Sync>;

struct Encoder {
    tag: u32,
    accepts: Predicate,
    write: Writer,
}

/// Tag-dispatched value codec with extensible registries.
///
/// Encoding scans registered encoders newest-first and takes the first whose
/// predicate accepts the value; the built-in JSON encoder registers first and
/// therefore acts as the fallback of last resort. Decoding dispatches on the
/// u32 tag leading every encoded value.
pub struct ValueCodec {
    encoders: Vec<Encoder>,
    decoders: HashMap<u32, Reader>,
}

impl ValueCodec {
    /// A codec with the five built-in tags registered.
    pub fn new() -> Self {
        let mut codec = Self {
            encoders: Vec::new(),
            decoders: HashMap::new(),
        };

        codec.insert(
            tags::JSON,
            Box::new(|_| true),
            Box::new(|_, buf, value| {
                let text = serde_json::to_string(&value.to_json()?)?;
                buf.write_str(&text);
                Ok(())
            }),
            Box::new(|_, buf| {
                let text = buf.read_str()?;
                Ok(Value::from_json(serde_json::from_str(&text)?))
            }),
        );

        codec.insert(
            tags::BYTES,
            Box::new(|value| matches!(value, Value::Bytes(_))),
            Box::new(|_, buf, value| {
                if let Value::Bytes(b) = value {
                    buf.write_blob(b);
                }
                Ok(())
            }),
            Box::new(|_, buf| Ok(Value::Bytes(buf.read_blob()?))),
        );

        codec.insert(
            tags::ARRAY,
            Box::new(|value| matches!(value, Value::Array(_))),
            Box::new(|codec, buf, value| {
                if let Value::Array(items) = value {
                    codec.encode_array(buf, items)?;
                }
                Ok(())
            }),
            Box::new(|codec, buf| Ok(Value::Array(codec.decode_array(buf)?))),
        );

        codec.insert(
            tags::ABSENT,
            Box::new(Value::is_absent),
            Box::new(|_, _, _| Ok(())),
            Box::new(|_, _| Ok(Value::Absent)),
        );

        codec.insert(
            tags::RECORD,
            Box::new(|value| matches!(value, Value::Record(_))),
            Box::new(|codec, buf, value| {
                if let Value::Record(fields) = value {
                    buf.write_u32(fields.len() as u32);
                    for (key, field) in fields {
                        buf.write_str(key);
                        codec.encode(buf, field)?;
                    }
                }
                Ok(())
            }),
            Box::new(|codec, buf| {
                let count = buf.read_u32()?;
                let mut fields = Record::new();
                for _ in 0..count {
                    let key = buf.read_str()?;
                    let value = codec.decode(buf)?;
                    fields.insert(key, value);
                }
                Ok(Value::Record(fields))
            }),
        );

        codec
    }

    fn insert(&mut self, tag: u32, accepts: Predicate, write: Writer, read: Reader) {
        self.encoders.push(Encoder { tag, accepts, write });
        self.decoders.insert(tag, read);
    }

    /// Register a custom encoder. Later registrations take precedence.
    pub fn register_encoder(&mut self, tag: u32, accepts: Predicate, write: Writer) -> Result<()> {
        if self.encoders.iter().any(|enc| enc.tag == tag) {
            return Err(CodecError::DuplicateTag(tag));
        }
        self.encoders.push(Encoder { tag, accepts, write });
        Ok(())
    }

    /// Register a custom decoder for a tag.
    pub fn register_decoder(&mut self, tag: u32, read: Reader) -> Result<()> {
        if self.decoders.contains_key(&tag) {
            return Err(CodecError::DuplicateTag(tag));
        }
        self.decoders.insert(tag, read);
        Ok(())
    }

    /// Register an encoder/decoder pair for a new tag.
    pub fn register(
        &mut self,
        tag: u32,
        accepts: Predicate,
        write: Writer,
        read: Reader,
    ) -> Result<()> {
        self.register_encoder(tag, accepts, write)?;
        self.register_decoder(tag, read)
    }

    /// Encode one value: tag, then tag-specific payload.
    pub fn encode(&self, buf: &mut WriteBuffer, value: &Value) -> Result<()> {
        for encoder in self.encoders.iter().rev() {
            if (encoder.accepts)(value) {
                buf.write_u32(encoder.tag);
                return (encoder.write)(self, buf, value);
            }
        }
        // Unreachable while the JSON fallback is registered.
        Err(CodecError::NotJson("no encoder claimed value"))
    }

    /// Decode one value.
    pub fn decode(&self, buf: &mut ReadBuffer) -> Result<Value> {
        let tag = buf.read_u32()?;
        let reader = self
            .decoders
            .get(&tag)
            .ok_or(CodecError::UnknownTag(tag))?;
        reader(self, buf)
    }

    /// Encode a u32-count-prefixed value sequence.
    pub fn encode_array(&self, buf: &mut WriteBuffer, items: &[Value]) -> Result<()> {
        buf.write_u32(items.len() as u32);
        for item in items {
            self.encode(buf, item)?;
        }
        Ok(())
    }

    /// Decode a u32-count-prefixed value sequence.
    pub fn decode_array(&self, buf: &mut ReadBuffer) -> Result<Vec<Value>> {
        let count = buf.read_u32()?;
        let mut items = Vec::with_capacity(count.min(4096) as usize);
        for _ in 0..count {
            items.push(self.decode(buf)?);
        }
        Ok(items)
    }
}

impl Default for ValueCodec {
    fn default() -> Self {
        Self::new()
    }
}
