use bytes::{BufMut, Bytes, BytesMut};

const INITIAL_CAPACITY: usize = 8 * 1024;

/// An append-only byte region for building one outgoing frame.
///
/// Writes chain (`buf.write_u8(1).write_str("x")`) and grow the backing
/// storage on demand. `commit` consumes the buffer and publishes the bytes
/// written so far; committing twice or writing after commit cannot be
/// expressed.
#[derive(Debug)]
pub struct WriteBuffer {
    buf: BytesMut,
}

impl WriteBuffer {
    /// Create an empty buffer with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an empty buffer with explicit initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether anything has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write a single octet.
    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.buf.put_u8(v);
        self
    }

    /// Write a 32-bit integer, big-endian.
    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.buf.put_u32(v);
        self
    }

    /// Write an IEEE-754 double, big-endian.
    pub fn write_f64(&mut self, v: f64) -> &mut Self {
        self.buf.put_f64(v);
        self
    }

    /// Write a varint length: 7 bits per byte, least-significant group
    /// first, high bit set on every byte except the last.
    pub fn write_var_len(&mut self, mut n: u32) -> &mut Self {
        while n >= 0x80 {
            self.buf.put_u8((n as u8 & 0x7F) | 0x80);
            n >>= 7;
        }
        self.buf.put_u8(n as u8);
        self
    }

    /// Write a UTF-8 string prefixed with its **byte** length as u32 BE.
    pub fn write_str(&mut self, s: &str) -> &mut Self {
        let bytes = s.as_bytes();
        assert!(bytes.len() <= u32::MAX as usize, "string exceeds u32 length");
        self.buf.put_u32(bytes.len() as u32);
        self.buf.put_slice(bytes);
        self
    }

    /// Write a raw byte blob prefixed with its varint length.
    pub fn write_blob(&mut self, b: &[u8]) -> &mut Self {
        assert!(b.len() <= u32::MAX as usize, "blob exceeds u32 length");
        self.write_var_len(b.len() as u32);
        self.buf.put_slice(b);
        self
    }

    /// Append pre-encoded bytes verbatim.
    pub fn write_raw(&mut self, b: &[u8]) -> &mut Self {
        self.buf.put_slice(b);
        self
    }

    /// Publish the bytes written so far. Consumes the buffer.
    pub fn commit(self) -> Bytes {
        self.buf.freeze()
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}
