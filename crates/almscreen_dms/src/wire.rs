//! Frame layer: fixed header + JSON payload

use crate::error::{DmsError, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// Protocol version
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Maximum payload size (64 MiB; a full-project response stays well below)
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Frame OpCodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Client -> Server (Handshake): "This is who I am."
    Identify = 1,
    /// Client -> Server: "Read these datapoints."
    Get = 2,
    /// Client -> Server: "Write this datapoint."
    Set = 3,
    /// Server -> Client: answer to any request
    Reply = 4,
}

impl OpCode {
    /// Convert u8 to OpCode
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            1 => Ok(OpCode::Identify),
            2 => Ok(OpCode::Get),
            3 => Ok(OpCode::Set),
            4 => Ok(OpCode::Reply),
            _ => Err(DmsError::InvalidOpCode(value)),
        }
    }

    /// Convert OpCode to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub opcode: OpCode,
    pub reserved: u16,
    pub payload_len: u32,
}

impl Header {
    /// Create a new header
    pub fn new(opcode: OpCode, payload_len: u32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            opcode,
            reserved: 0,
            payload_len,
        }
    }

    /// Pack header into an 8-byte buffer
    pub fn pack(&self) -> Result<[u8; HEADER_SIZE]> {
        let mut buf = [0u8; HEADER_SIZE];
        let mut cursor = Cursor::new(&mut buf[..]);

        cursor.write_u8(self.version)?;
        cursor.write_u8(self.opcode.as_u8())?;
        cursor.write_u16::<BigEndian>(self.reserved)?;
        cursor.write_u32::<BigEndian>(self.payload_len)?;

        Ok(buf)
    }

    /// Unpack header from an 8-byte buffer
    pub fn unpack(data: &[u8; HEADER_SIZE]) -> Result<Self> {
        let mut cursor = Cursor::new(&data[..]);

        let version = cursor.read_u8()?;
        let op_raw = cursor.read_u8()?;
        let reserved = cursor.read_u16::<BigEndian>()?;
        let payload_len = cursor.read_u32::<BigEndian>()?;

        if version != PROTOCOL_VERSION {
            return Err(DmsError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                got: version,
            });
        }

        let opcode = OpCode::from_u8(op_raw)?;

        Ok(Self {
            version,
            opcode,
            reserved,
            payload_len,
        })
    }
}

/// A complete frame (header + payload)
#[derive(Debug, Clone)]
pub struct Frame {
    pub header: Header,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Create a new frame
    ///
    /// Returns an error if payload exceeds MAX_PAYLOAD_SIZE.
    pub fn new(opcode: OpCode, payload: Vec<u8>) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(DmsError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        let header = Header::new(opcode, payload.len() as u32);
        Ok(Self { header, payload })
    }

    /// Write the frame to a blocking stream
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.header.pack()?)?;
        writer.write_all(&self.payload)?;
        writer.flush()?;
        Ok(())
    }

    /// Read one frame from a blocking stream
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut header_buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_buf)?;
        let header = Header::unpack(&header_buf)?;

        let len = header.payload_len as usize;
        if len > MAX_PAYLOAD_SIZE {
            return Err(DmsError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload)?;

        Ok(Self { header, payload })
    }
}
