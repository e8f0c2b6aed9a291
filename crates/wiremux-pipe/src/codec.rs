use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{PipeError, Result};

/// Packet header: magic (2) + length (4) = 6 bytes.
pub const HEADER_SIZE: usize = 6;

/// Magic bytes: "WM" (0x57 0x4D).
pub const MAGIC: [u8; 2] = [0x57, 0x4D];

/// Default maximum frame size: 16 MiB.
pub const DEFAULT_MAX_FRAME: usize = 16 * 1024 * 1024;

/// Configuration for a packet stream.
#[derive(Debug, Clone)]
pub struct PipeConfig {
    /// Maximum frame size in bytes. Default: 16 MiB.
    pub max_frame_size: usize,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME,
        }
    }
}

/// Encode one frame into the packet wire format.
///
/// ```text
/// ┌────────────┬─────────────┬──────────────────┐
/// │ Magic (2B) │ Length      │ Frame            │
/// │ 0x57 0x4D  │ (4B BE)     │ (Length bytes)   │
/// └────────────┴─────────────┴──────────────────┘
/// ```
pub fn encode_packet(frame: &[u8], dst: &mut BytesMut) -> Result<()> {
    if frame.len() > u32::MAX as usize {
        return Err(PipeError::FrameTooLarge {
            size: frame.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + frame.len());
    dst.put_slice(&MAGIC);
    dst.put_u32(frame.len() as u32);
    dst.put_slice(frame);
    Ok(())
}

/// Decode one packet from a buffer.
///
/// Returns `Ok(None)` until the buffer holds a complete packet; on success
/// the packet bytes are consumed from the buffer.
pub fn decode_packet(src: &mut BytesMut, max_frame: usize) -> Result<Option<Bytes>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    if src[0..2] != MAGIC {
        return Err(PipeError::InvalidMagic);
    }

    let frame_len = u32::from_be_bytes([src[2], src[3], src[4], src[5]]) as usize;
    if frame_len > max_frame {
        return Err(PipeError::FrameTooLarge {
            size: frame_len,
            max: max_frame,
        });
    }

    if src.len() < HEADER_SIZE + frame_len {
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    Ok(Some(src.split_to(frame_len).freeze()))
}
