//! Blocking DMS client and the store trait consumed by the mapper

use crate::error::{DmsError, Result};
use crate::types::{DpValue, GetRequest, Identify, Query, SetAck, SetRequest};
use crate::wire::{Frame, OpCode};
use std::net::TcpStream;
use tracing::debug;

/// Read/write access to a DMS datapoint tree.
///
/// All calls block until the store answers or fails; no retries happen at
/// this layer.
pub trait DmsStore {
    /// Read datapoints under `path` ("" = whole tree), optionally filtered
    fn dp_get(&mut self, path: &str, query: Option<&Query>) -> Result<Vec<DpValue>>;

    /// Write one datapoint, creating it when `create` is set
    fn dp_set(&mut self, path: &str, value: &str, create: bool) -> Result<SetAck>;
}

/// TCP client for the DMS JSON Data Exchange
pub struct DmsClient {
    stream: TcpStream,
}

impl DmsClient {
    /// Connect and identify.
    ///
    /// The server expects one Identify frame before the first request.
    pub fn connect(host: &str, port: u16, whois: &str, user: &str) -> Result<Self> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;
        debug!(host, port, "connected to DMS");

        let mut client = Self { stream };
        let identify = Identify {
            whois: whois.to_string(),
            user: user.to_string(),
        };
        client.send(OpCode::Identify, &serde_json::to_vec(&identify)?)?;
        // Identify is acknowledged with an empty Reply
        client.receive()?;
        Ok(client)
    }

    fn send(&mut self, opcode: OpCode, payload: &[u8]) -> Result<()> {
        Frame::new(opcode, payload.to_vec())?.write_to(&mut self.stream)
    }

    fn receive(&mut self) -> Result<Vec<u8>> {
        let frame = Frame::read_from(&mut self.stream)?;
        if frame.header.opcode != OpCode::Reply {
            return Err(DmsError::UnexpectedReply(frame.header.opcode));
        }
        Ok(frame.payload)
    }
}

impl DmsStore for DmsClient {
    fn dp_get(&mut self, path: &str, query: Option<&Query>) -> Result<Vec<DpValue>> {
        let request = GetRequest {
            path: path.to_string(),
            query: query.cloned(),
        };
        self.send(OpCode::Get, &serde_json::to_vec(&request)?)?;

        let payload = self.receive()?;
        let responses: Vec<DpValue> = serde_json::from_slice(&payload)?;
        debug!(path, responses = responses.len(), "dp_get");
        Ok(responses)
    }

    fn dp_set(&mut self, path: &str, value: &str, create: bool) -> Result<SetAck> {
        let request = SetRequest {
            path: path.to_string(),
            value: value.to_string(),
            create,
        };
        self.send(OpCode::Set, &serde_json::to_vec(&request)?)?;

        let payload = self.receive()?;
        let ack: SetAck = serde_json::from_slice(&payload)?;
        Ok(ack)
    }
}
