use crate::model::peer::PeerId;
use crate::model::room::RoomCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Type tag of a [`SignalMessage`].
///
/// Unknown tags decode into [`SignalType::Unrecognized`] instead of failing,
/// so the envelope of a message from a newer client still parses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalType {
    Offer,
    Answer,
    IceCandidate,
    JoinRoom,
    LeaveRoom,
    /// Server-originated arrival announcement.
    PeerJoined,
    /// Server-originated departure announcement.
    PeerLeft,
    Unrecognized(String),
}

impl SignalType {
    pub fn as_str(&self) -> &str {
        match self {
            SignalType::Offer => "offer",
            SignalType::Answer => "answer",
            SignalType::IceCandidate => "ice_candidate",
            SignalType::JoinRoom => "join_room",
            SignalType::LeaveRoom => "leave_room",
            SignalType::PeerJoined => "peer_joined",
            SignalType::PeerLeft => "peer_left",
            SignalType::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for SignalType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "offer" => SignalType::Offer,
            "answer" => SignalType::Answer,
            "ice_candidate" => SignalType::IceCandidate,
            "join_room" => SignalType::JoinRoom,
            "leave_room" => SignalType::LeaveRoom,
            "peer_joined" => SignalType::PeerJoined,
            "peer_left" => SignalType::PeerLeft,
            _ => SignalType::Unrecognized(tag),
        }
    }
}

impl From<SignalType> for String {
    fn from(kind: SignalType) -> Self {
        match kind {
            SignalType::Unrecognized(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

/// Payload of a `join_room` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub room_code: RoomCode,
}

/// Payload of `peer_joined` / `peer_left` announcements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerAnnouncement {
    pub peer_id: PeerId,
}

/// The signaling envelope exchanged with clients.
///
/// `payload` is opaque to the server except for `join_room`; forwarded
/// messages are re-sent exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMessage {
    #[serde(rename = "type")]
    pub kind: SignalType,
    #[serde(default)]
    pub from: PeerId,
    #[serde(default)]
    pub to: PeerId,
    #[serde(default)]
    pub payload: Value,
}

impl SignalMessage {
    pub fn new(kind: SignalType, from: PeerId, to: PeerId, payload: Value) -> Self {
        Self {
            kind,
            from,
            to,
            payload,
        }
    }

    pub fn peer_joined(peer_id: &PeerId) -> Self {
        Self::announcement(SignalType::PeerJoined, peer_id)
    }

    pub fn peer_left(peer_id: &PeerId) -> Self {
        Self::announcement(SignalType::PeerLeft, peer_id)
    }

    fn announcement(kind: SignalType, peer_id: &PeerId) -> Self {
        Self::new(
            kind,
            peer_id.clone(),
            PeerId::default(),
            json!({ "peer_id": peer_id }),
        )
    }

    /// Explicit recipient, or `None` for an empty `to`.
    pub fn recipient(&self) -> Option<&PeerId> {
        if self.to.is_empty() {
            None
        } else {
            Some(&self.to)
        }
    }

    /// Decodes the target room of a `join_room` request.
    ///
    /// Accepts the payload either as an object or as a string holding the
    /// JSON-encoded object.
    pub fn join_room_payload(&self) -> Result<JoinRoomPayload, serde_json::Error> {
        let payload = match &self.payload {
            Value::String(raw) => serde_json::from_str::<JoinRoomPayload>(raw)?,
            other => JoinRoomPayload::deserialize(other)?,
        };

        if payload.room_code.is_empty() {
            return Err(serde::de::Error::custom("room_code must not be empty"));
        }

        Ok(payload)
    }
}
