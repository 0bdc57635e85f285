use crate::error::ChannelError;
use parking_lot::Mutex;
use rendezvous_core::SignalMessage;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Messages a peer may have queued before further sends to it fail.
pub const OUTBOUND_CAPACITY: usize = 256;

/// Outbound half of a peer connection.
///
/// `send` only enqueues, so it is safe to call while holding registry locks.
/// The queue is drained by a writer task owned by the transport. A peer that
/// stops reading fills its queue and further sends fail with
/// [`ChannelError::Full`] instead of buffering without bound.
#[derive(Debug)]
pub struct PeerChannel {
    tx: Mutex<Option<mpsc::Sender<SignalMessage>>>,
}

impl PeerChannel {
    pub fn new() -> (Self, mpsc::Receiver<SignalMessage>) {
        Self::with_capacity(OUTBOUND_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<SignalMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        let channel = Self {
            tx: Mutex::new(Some(tx)),
        };
        (channel, rx)
    }

    pub fn send(&self, msg: SignalMessage) -> Result<(), ChannelError> {
        let guard = self.tx.lock();
        let tx = guard.as_ref().ok_or(ChannelError::Closed)?;
        tx.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => ChannelError::Full,
            TrySendError::Closed(_) => ChannelError::Closed,
        })
    }

    /// Drops the queue. Returns `false` if the channel was already closed.
    pub fn close(&self) -> bool {
        self.tx.lock().take().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.lock().as_ref().is_none_or(|tx| tx.is_closed())
    }
}
