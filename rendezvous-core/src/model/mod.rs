mod peer;
mod room;
mod signaling;

pub use peer::PeerId;
pub use room::{RoomCode, RoomId};
pub use signaling::{JoinRoomPayload, PeerAnnouncement, SignalMessage, SignalType};
