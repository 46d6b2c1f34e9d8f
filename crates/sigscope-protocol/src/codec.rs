use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{Command, Event, MAX_MESSAGE_SIZE};

/// Codec for sigscope protocol frames: [4 bytes big-endian len][bincode payload].
pub struct SigCodec;

impl SigCodec {
    /// Encode a command frame (client -> backend).
    pub fn encode_command(command: &Command) -> ProtocolResult<Vec<u8>> {
        encode(command)
    }

    /// Encode an event frame (backend -> client).
    pub fn encode_event(event: &Event) -> ProtocolResult<Vec<u8>> {
        encode(event)
    }

    /// Decode a command frame. Returns (command, bytes_consumed).
    pub fn decode_command(data: &[u8]) -> ProtocolResult<(Command, usize)> {
        decode(data)
    }

    /// Decode an event frame. Returns (event, bytes_consumed).
    pub fn decode_event(data: &[u8]) -> ProtocolResult<(Event, usize)> {
        decode(data)
    }

    /// Validate a frame length header against the size guard.
    pub fn check_len(len: usize) -> ProtocolResult<()> {
        if len == 0 {
            return Err(ProtocolError::FramingError("zero-length frame".into()));
        }
        if len > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: len,
                max: MAX_MESSAGE_SIZE,
            });
        }
        Ok(())
    }

    /// Decode a payload that has already been stripped of its length header.
    pub fn decode_event_payload(payload: &[u8]) -> ProtocolResult<Event> {
        bincode::deserialize(payload).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }

    /// Decode a command payload without its length header.
    pub fn decode_command_payload(payload: &[u8]) -> ProtocolResult<Command> {
        bincode::deserialize(payload).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }
}

fn encode<T: Serialize>(msg: &T) -> ProtocolResult<Vec<u8>> {
    let payload =
        bincode::serialize(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: payload.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }
    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

fn decode<T: DeserializeOwned>(data: &[u8]) -> ProtocolResult<(T, usize)> {
    if data.len() < 4 {
        return Err(ProtocolError::FramingError("too short".into()));
    }
    let len = u32::from_be_bytes(data[0..4].try_into().expect("4-byte slice")) as usize;
    SigCodec::check_len(len)?;
    let total = 4 + len;
    if data.len() < total {
        return Err(ProtocolError::FramingError(format!(
            "incomplete: have {}, need {}",
            data.len(),
            total
        )));
    }
    let msg = bincode::deserialize(&data[4..total])
        .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
    Ok((msg, total))
}
