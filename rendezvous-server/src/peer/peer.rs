use crate::error::ChannelError;
use crate::transport::PeerChannel;
use parking_lot::Mutex;
use rendezvous_core::{PeerId, RoomCode, SignalMessage};

#[derive(Debug, Default)]
struct RoomState {
    current: Option<RoomCode>,
    last: Option<RoomCode>,
}

/// One connected participant.
///
/// Owns the outbound channel. The current room is only written by the room
/// registry while it holds the lock of the room concerned. The last room
/// survives an explicit leave so the departure can still be announced there.
#[derive(Debug)]
pub struct Peer {
    id: PeerId,
    channel: PeerChannel,
    room: Mutex<RoomState>,
}

impl Peer {
    pub fn new(id: PeerId, channel: PeerChannel) -> Self {
        Self {
            id,
            channel,
            room: Mutex::new(RoomState::default()),
        }
    }

    pub fn id(&self) -> &PeerId {
        &self.id
    }

    pub fn current_room(&self) -> Option<RoomCode> {
        self.room.lock().current.clone()
    }

    /// The room most recently joined, whether or not the peer left it since.
    pub fn last_room(&self) -> Option<RoomCode> {
        self.room.lock().last.clone()
    }

    pub(crate) fn set_current_room(&self, code: RoomCode) {
        let mut room = self.room.lock();
        room.last = Some(code.clone());
        room.current = Some(code);
    }

    pub(crate) fn clear_current_room_if(&self, code: &RoomCode) {
        let mut room = self.room.lock();
        if room.current.as_ref() == Some(code) {
            room.current = None;
        }
    }

    pub fn send(&self, msg: SignalMessage) -> Result<(), ChannelError> {
        self.channel.send(msg)
    }

    pub fn close(&self) -> bool {
        self.channel.close()
    }

    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }
}
