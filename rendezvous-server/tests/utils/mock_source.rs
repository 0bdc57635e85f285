use async_trait::async_trait;
use rendezvous_core::SignalMessage;
use rendezvous_server::{ChannelError, SignalSource};
use tokio::sync::mpsc;

/// A frame pushed into a [`MockSignalSource`] by the test.
#[derive(Debug)]
pub enum Frame {
    /// Raw text, decoded like a WebSocket text frame.
    Text(String),
    /// Simulated read error on the underlying transport.
    Fail(String),
}

/// SignalSource fed from a test-controlled queue.
///
/// Dropping the [`mpsc::UnboundedSender`] behaves like an orderly remote close.
pub struct MockSignalSource {
    frames: mpsc::UnboundedReceiver<Frame>,
}

impl MockSignalSource {
    pub fn new() -> (Self, mpsc::UnboundedSender<Frame>) {
        let (tx, frames) = mpsc::unbounded_channel();
        (Self { frames }, tx)
    }
}

#[async_trait]
impl SignalSource for MockSignalSource {
    async fn recv(&mut self) -> Result<Option<SignalMessage>, ChannelError> {
        match self.frames.recv().await {
            Some(Frame::Text(text)) => Ok(Some(serde_json::from_str(&text)?)),
            Some(Frame::Fail(reason)) => Err(ChannelError::Transport(reason)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_decodes_frames() {
        let (mut source, tx) = MockSignalSource::new();

        tx.send(Frame::Text(r#"{"type":"leave_room","from":"a"}"#.into()))
            .unwrap();
        tx.send(Frame::Text("{broken".into())).unwrap();
        drop(tx);

        assert!(source.recv().await.unwrap().is_some());
        assert!(matches!(source.recv().await, Err(ChannelError::Decode(_))));
        assert!(source.recv().await.unwrap().is_none());
    }
}
