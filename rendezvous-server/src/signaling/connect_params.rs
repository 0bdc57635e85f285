use crate::error::SignalingError;
use rendezvous_core::{PeerId, RoomCode};
use serde::Deserialize;

/// Connection-time parameters, taken from the upgrade request query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectParams {
    pub peer_id: Option<String>,
    pub room: Option<String>,
}

impl ConnectParams {
    pub fn new(peer_id: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            peer_id: Some(peer_id.into()),
            room: Some(room.into()),
        }
    }

    /// Both values must be present and non-empty.
    pub fn admit(self) -> Result<(PeerId, RoomCode), SignalingError> {
        let peer_id = self
            .peer_id
            .filter(|id| !id.is_empty())
            .ok_or(SignalingError::MissingPeerId)?;
        let room = self
            .room
            .filter(|room| !room.is_empty())
            .ok_or(SignalingError::MissingRoomCode)?;

        Ok((PeerId::from(peer_id), RoomCode::from(room)))
    }
}
