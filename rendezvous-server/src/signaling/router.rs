use crate::error::{ChannelError, SignalingError};
use crate::peer::{Peer, PeerRegistry};
use crate::room::RoomRegistry;
use crate::signaling::ConnectParams;
use crate::transport::{PeerChannel, SignalSource};
use rendezvous_core::{RoomCode, SignalMessage, SignalType};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};

/// Why an active connection ended.
#[derive(Debug)]
enum Disconnect {
    Closed,
    Failed(ChannelError),
}

/// Per-connection control loop over the shared peer and room registries.
#[derive(Clone, Default)]
pub struct SignalingRouter {
    peers: PeerRegistry,
    rooms: RoomRegistry,
}

impl SignalingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peers(&self) -> &PeerRegistry {
        &self.peers
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Runs one connection from admission to teardown.
    ///
    /// Returns an error only when the connection is refused; in that case the
    /// channel is closed and nothing was registered. Otherwise the call
    /// returns once the source closes or fails and cleanup is done.
    pub async fn serve<S>(
        &self,
        params: ConnectParams,
        channel: PeerChannel,
        mut source: S,
    ) -> Result<(), SignalingError>
    where
        S: SignalSource,
    {
        let (peer_id, room) = match params.admit() {
            Ok(admitted) => admitted,
            Err(e) => {
                warn!("Rejecting connection: {}", e);
                channel.close();
                return Err(e);
            }
        };

        let span = info_span!("peer", id = %peer_id);
        let peer = Arc::new(Peer::new(peer_id, channel));

        async {
            self.activate(&peer, room);
            let reason = self.pump(&peer, &mut source).await;
            self.deactivate(&peer, reason);
        }
        .instrument(span)
        .await;

        Ok(())
    }

    fn activate(&self, peer: &Arc<Peer>, room: RoomCode) {
        info!("Peer connected to room {}", room);

        self.peers.add(Arc::clone(peer));
        self.rooms.join_room(room.clone(), peer);
        self.rooms
            .broadcast(&room, &SignalMessage::peer_joined(peer.id()), Some(peer.id()));
    }

    async fn pump<S: SignalSource>(&self, peer: &Arc<Peer>, source: &mut S) -> Disconnect {
        loop {
            match source.recv().await {
                Ok(Some(msg)) => self.dispatch(peer, msg),
                Ok(None) => return Disconnect::Closed,
                Err(e) => return Disconnect::Failed(e),
            }
        }
    }

    fn dispatch(&self, peer: &Arc<Peer>, msg: SignalMessage) {
        debug!(
            "Received message: type={}, to={}",
            msg.kind.as_str(),
            msg.to
        );

        match msg.kind {
            SignalType::Offer | SignalType::Answer | SignalType::IceCandidate => {
                let Some(to) = msg.recipient().cloned() else {
                    debug!("Dropping {} without recipient", msg.kind.as_str());
                    return;
                };
                if let Err(e) = self.rooms.send_to_peer(&to, msg) {
                    warn!("Failed to route message: {}", e);
                }
            }
            SignalType::JoinRoom => match msg.join_room_payload() {
                Ok(payload) => self.rooms.join_room(payload.room_code, peer),
                Err(e) => warn!("Ignoring malformed join_room payload: {}", e),
            },
            SignalType::LeaveRoom => {
                if let Some(room) = peer.current_room() {
                    self.rooms.leave_room_as(&room, peer);
                }
            }
            SignalType::PeerJoined | SignalType::PeerLeft => {
                debug!("Ignoring server-originated {} from client", msg.kind.as_str());
            }
            SignalType::Unrecognized(tag) => debug!("Unknown message type: {}", tag),
        }
    }

    fn deactivate(&self, peer: &Arc<Peer>, reason: Disconnect) {
        match reason {
            Disconnect::Closed => info!("Peer disconnected"),
            Disconnect::Failed(e) => info!("Peer connection ended: {}", e),
        }

        self.peers.release(peer);

        let last_room = peer.last_room();
        let mut left = self.rooms.evict(peer);

        // An explicit leave_room does not spare the last room the announcement,
        // unless a newer connection with the same id is in it.
        if let Some(last) = last_room {
            let successor_present = self
                .rooms
                .get_room(&last)
                .is_some_and(|room| room.contains(peer.id()));
            if !left.contains(&last) && !successor_present {
                left.push(last);
            }
        }

        let farewell = SignalMessage::peer_left(peer.id());
        for room in left {
            self.rooms.broadcast(&room, &farewell, None);
        }
    }
}
