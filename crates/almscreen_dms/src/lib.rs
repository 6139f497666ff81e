//! DMS JSON Data Exchange client
//!
//! Wire format for talking to a DMS process server.
//!
//! # Protocol Specification
//!
//! Header Format: 8 bytes, Network Byte Order / Big Endian
//! ```text
//! [VER:1][OP:1][RES:2][LEN:4]
//! ```
//!
//! - VER (u8): Protocol version (0x01)
//! - OP (u8): OpCode
//! - RES (u16): Reserved for future use
//! - LEN (u32): Payload length in bytes
//!
//! Payloads are JSON documents (camelCase field names). Every request is
//! answered with a single Reply frame carrying a JSON array of responses.

pub mod client;
pub mod error;
pub mod memory;
pub mod types;
pub mod wire;

pub use client::{DmsClient, DmsStore};
pub use error::{DmsError, Result};
pub use memory::MemoryDms;
pub use types::{DpValue, Query, SetAck};
pub use wire::{Frame, Header, OpCode, HEADER_SIZE, MAX_PAYLOAD_SIZE, PROTOCOL_VERSION};
