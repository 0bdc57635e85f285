use rendezvous_core::PeerId;
use thiserror::Error;

/// Failure of a single connection channel operation.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel is closed")]
    Closed,

    #[error("outbound queue is full")]
    Full,

    #[error("failed to decode signal message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Point-to-point delivery failure. Never reported back to the sender.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("peer {0} is not a member of any room")]
    PeerNotFound(PeerId),

    #[error("failed to deliver to peer {peer_id}: {source}")]
    Delivery {
        peer_id: PeerId,
        #[source]
        source: ChannelError,
    },
}

/// Admission failure: the connection is dropped before any state exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalingError {
    #[error("no peer_id provided")]
    MissingPeerId,

    #[error("no room code provided")]
    MissingRoomCode,
}
