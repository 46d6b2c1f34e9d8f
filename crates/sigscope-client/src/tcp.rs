use async_trait::async_trait;
use sigscope_protocol::codec::SigCodec;
use sigscope_protocol::{Command, Event, ProtocolResult};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::debug;

use crate::backend::{Backend, EventStream, EVENT_CHANNEL_CAPACITY};
use crate::error::{ClientError, ClientResult};

/// Backend connection over TCP, one connection per command.
pub struct TcpBackend {
    addr: String,
}

impl TcpBackend {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Backend for TcpBackend {
    async fn submit(&self, command: Command) -> ClientResult<EventStream> {
        debug!(addr = %self.addr, command = command.type_name(), "submitting command");
        let mut stream = TcpStream::connect(&self.addr).await.map_err(|e| {
            ClientError::BackendUnavailable(format!("cannot connect to {}: {e}", self.addr))
        })?;
        let frame = SigCodec::encode_command(&command)?;
        stream.write_all(&frame).await.map_err(|e| {
            ClientError::BackendUnavailable(format!("command submission failed: {e}"))
        })?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            if let Err(e) = pump_events(stream, &tx).await {
                // Surface a broken transport as a terminal failure so the
                // session's loop always sees exactly one terminal event.
                let _ = tx
                    .send(Event::Failed {
                        message: format!("transport error: {e}"),
                    })
                    .await;
            }
        });
        Ok(rx)
    }
}

/// Read framed events off the socket and forward them until a terminal
/// event has been delivered or the receiver goes away.
async fn pump_events(mut stream: TcpStream, tx: &mpsc::Sender<Event>) -> ProtocolResult<()> {
    loop {
        let mut len_buf = [0u8; 4];
        stream.read_exact(&mut len_buf).await?;
        let len = u32::from_be_bytes(len_buf) as usize;
        SigCodec::check_len(len)?;
        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).await?;
        let event = SigCodec::decode_event_payload(&payload)?;
        let terminal = event.is_terminal();
        if tx.send(event).await.is_err() || terminal {
            return Ok(());
        }
    }
}
