use std::io::{ErrorKind, Write};
use std::sync::{Mutex, PoisonError};

use bytes::{Bytes, BytesMut};
use wiremux_mux::FrameSink;

use crate::codec::{encode_packet, PipeConfig};
use crate::error::{PipeError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes whole packets to any `Write` stream.
pub struct PacketWriter<T> {
    inner: T,
    buf: BytesMut,
    config: PipeConfig,
}

impl<T: Write> PacketWriter<T> {
    /// Create a packet writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, PipeConfig::default())
    }

    /// Create a packet writer with explicit configuration.
    pub fn with_config(inner: T, config: PipeConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and send one frame (blocking).
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() > self.config.max_frame_size {
            return Err(PipeError::FrameTooLarge {
                size: frame.len(),
                max: self.config.max_frame_size,
            });
        }

        self.buf.clear();
        encode_packet(frame, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(PipeError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PipeError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PipeError::Io(err)),
            }
        }
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// A lock-guarded [`PacketWriter`] usable as a multiplexer sink.
pub struct SharedWriter<T> {
    writer: Mutex<PacketWriter<T>>,
}

impl<T: Write> SharedWriter<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, PipeConfig::default())
    }

    pub fn with_config(inner: T, config: PipeConfig) -> Self {
        Self {
            writer: Mutex::new(PacketWriter::with_config(inner, config)),
        }
    }

    /// Send one frame through the shared writer.
    pub fn send(&self, frame: &[u8]) -> Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(frame)
    }
}

impl<T: Write + Send> FrameSink for SharedWriter<T> {
    fn send_frame(&self, frame: Bytes) -> std::io::Result<()> {
        self.send(frame.as_ref()).map_err(|err| match err {
            PipeError::Io(io) => io,
            other => std::io::Error::other(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{decode_packet, DEFAULT_MAX_FRAME};

    #[test]
    fn send_writes_decodable_packet() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"hello").unwrap();

        let mut wire = BytesMut::from(writer.into_inner().into_inner().as_slice());
        let frame = decode_packet(&mut wire, DEFAULT_MAX_FRAME).unwrap().unwrap();
        assert_eq!(frame.as_ref(), b"hello");
    }

    #[test]
    fn oversized_frame_rejected_before_write() {
        let config = PipeConfig { max_frame_size: 4 };
        let mut writer = PacketWriter::with_config(Cursor::new(Vec::<u8>::new()), config);
        assert!(matches!(
            writer.send(b"too large"),
            Err(PipeError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn interrupted_write_retries() {
        struct InterruptedOnce {
            interrupted: bool,
            data: Vec<u8>,
        }

        impl Write for InterruptedOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = PacketWriter::new(InterruptedOnce {
            interrupted: false,
            data: Vec::new(),
        });
        writer.send(b"retry").unwrap();
        assert!(!writer.into_inner().data.is_empty());
    }

    #[test]
    fn zero_length_write_is_connection_closed() {
        struct ZeroWriter;

        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = PacketWriter::new(ZeroWriter);
        assert!(matches!(
            writer.send(b"x"),
            Err(PipeError::ConnectionClosed)
        ));
    }

    #[test]
    fn shared_writer_acts_as_frame_sink() {
        let writer = SharedWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_frame(Bytes::from_static(b"frame")).unwrap();
    }
}
