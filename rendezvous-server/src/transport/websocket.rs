use crate::error::ChannelError;
use crate::transport::SignalSource;
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use rendezvous_core::SignalMessage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Reads JSON signal envelopes from a WebSocket.
pub struct WsSource {
    stream: SplitStream<WebSocket>,
}

impl WsSource {
    pub fn new(stream: SplitStream<WebSocket>) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl SignalSource for WsSource {
    async fn recv(&mut self) -> Result<Option<SignalMessage>, ChannelError> {
        while let Some(frame) = self.stream.next().await {
            let frame = frame.map_err(|e| ChannelError::Transport(e.to_string()))?;

            match frame {
                Message::Text(text) => return Ok(Some(serde_json::from_str(text.as_str())?)),
                Message::Binary(data) => return Ok(Some(serde_json::from_slice(&data)?)),
                Message::Close(_) => return Ok(None),
                Message::Ping(_) | Message::Pong(_) => continue,
            }
        }

        Ok(None)
    }
}

/// Drains a peer's outbound queue into the socket.
///
/// Ends with a close frame once the queue is closed, or as soon as the
/// socket stops accepting writes.
pub fn spawn_writer(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<SignalMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize signal message: {}", e);
                    continue;
                }
            };

            if let Err(e) = sink.send(Message::Text(json.into())).await {
                debug!("WebSocket write failed: {}", e);
                return;
            }
        }

        let _ = sink.send(Message::Close(None)).await;
    })
}
