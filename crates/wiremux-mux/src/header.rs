use wiremux_buffer::{ReadBuffer, Result, WriteBuffer};

/// Control opcodes leading every pipe frame.
pub mod opcode {
    /// Remote requests a new channel with the given id.
    pub const OPEN: u8 = 1;
    /// Remote closes the given channel.
    pub const CLOSE: u8 = 2;
    /// Remote acknowledges a channel we requested.
    pub const ACK_OPEN: u8 = 3;
    /// Frame carries payload for an established channel.
    pub const DATA: u8 = 4;
}

/// Parsed `opcode | id` prefix of a pipe frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub opcode: u8,
    pub id: String,
}

impl Header {
    /// Read the header off the front of a frame, leaving any payload behind.
    pub fn read(buf: &mut ReadBuffer) -> Result<Self> {
        let opcode = buf.read_u8()?;
        let id = buf.read_str()?;
        Ok(Self { opcode, id })
    }

    /// Write an `opcode | id` prefix.
    pub fn write(buf: &mut WriteBuffer, opcode: u8, id: &str) {
        buf.write_u8(opcode).write_str(id);
    }
}

/// Human-readable opcode name for diagnostics.
pub fn opcode_name(op: u8) -> &'static str {
    match op {
        opcode::OPEN => "OPEN",
        opcode::CLOSE => "CLOSE",
        opcode::ACK_OPEN => "ACK_OPEN",
        opcode::DATA => "DATA",
        _ => "UNKNOWN",
    }
}
