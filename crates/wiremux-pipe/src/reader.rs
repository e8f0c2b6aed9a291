use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::codec::{decode_packet, PipeConfig};
use crate::error::{PipeError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads whole packets from any `Read` stream.
///
/// Partial reads are handled internally; callers always get complete frames.
pub struct PacketReader<T> {
    inner: T,
    buf: BytesMut,
    config: PipeConfig,
}

impl<T: Read> PacketReader<T> {
    /// Create a packet reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, PipeConfig::default())
    }

    /// Create a packet reader with explicit configuration.
    pub fn with_config(inner: T, config: PipeConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(PipeError::ConnectionClosed)` at EOF.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(frame) = decode_packet(&mut self.buf, self.config.max_frame_size)? {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PipeError::Io(err)),
            };

            if read == 0 {
                return Err(PipeError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
