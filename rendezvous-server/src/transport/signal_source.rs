use crate::error::ChannelError;
use async_trait::async_trait;
use rendezvous_core::SignalMessage;

/// Inbound half of a peer connection, consumed by the router loop.
#[async_trait]
pub trait SignalSource: Send {
    /// Waits for the next message.
    ///
    /// `Ok(None)` is an orderly remote close. Read failures and envelopes
    /// that do not decode are errors; both end the connection.
    async fn recv(&mut self) -> Result<Option<SignalMessage>, ChannelError>;
}
