use crate::error::RoutingError;
use crate::peer::Peer;
use crate::room::Room;
use parking_lot::RwLock;
use rendezvous_core::{PeerId, RoomCode, SignalMessage};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a room broadcast. Failed members do not stop delivery to the rest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: Vec<PeerId>,
}

/// Rooms by code.
///
/// The map lock covers creating and deleting rooms and the registry-wide
/// scan of `send_to_peer`; each room's lock covers its membership. Locks are
/// always taken map first, room second.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<RoomCode, Arc<Room>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room for `code`, creating an empty one if needed.
    pub fn create_room(&self, code: RoomCode) -> Arc<Room> {
        let mut rooms = self.rooms.write();
        Arc::clone(Self::entry(&mut rooms, code))
    }

    pub fn get_room(&self, code: &RoomCode) -> Option<Arc<Room>> {
        self.rooms.read().get(code).cloned()
    }

    /// Adds `peer` to the room, creating the room on first join.
    pub fn join_room(&self, code: RoomCode, peer: &Arc<Peer>) {
        {
            // A room reachable under the map lock cannot be deleted under us.
            let rooms = self.rooms.read();
            if let Some(room) = rooms.get(&code) {
                room.admit(peer);
                return;
            }
        }

        let mut rooms = self.rooms.write();
        Self::entry(&mut rooms, code).admit(peer);
    }

    /// Removes `id` from the room and deletes the room once it is empty.
    ///
    /// Returns `false` if the room or the membership did not exist.
    pub fn leave_room(&self, code: &RoomCode, id: &PeerId) -> bool {
        self.withdraw(code, id, |_| true)
    }

    /// Like [`leave_room`](Self::leave_room), but only if the membership
    /// belongs to this very connection and not to another one with the same id.
    pub fn leave_room_as(&self, code: &RoomCode, peer: &Arc<Peer>) -> bool {
        self.withdraw(code, peer.id(), |member| Arc::ptr_eq(member, peer))
    }

    /// Sends `message` to every member except `exclude`.
    pub fn broadcast(
        &self,
        code: &RoomCode,
        message: &SignalMessage,
        exclude: Option<&PeerId>,
    ) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let Some(room) = self.get_room(code) else {
            return report;
        };

        let members = room.members.lock();
        for (id, peer) in members.iter() {
            if Some(id) == exclude {
                continue;
            }
            match peer.send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!("Error sending {} to peer {}: {}", message.kind.as_str(), id, e);
                    report.failed.push(id.clone());
                }
            }
        }

        report
    }

    /// Delivers `message` to the peer wherever it is a member.
    ///
    /// This scans every room. A peer that is a member of several rooms
    /// shares one channel, so it is delivered to once.
    pub fn send_to_peer(&self, id: &PeerId, message: SignalMessage) -> Result<(), RoutingError> {
        let rooms = self.rooms.read();

        for room in rooms.values() {
            let members = room.members.lock();
            if let Some(peer) = members.get(id) {
                return peer.send(message).map_err(|source| {
                    warn!("Error sending message to peer {}: {}", id, source);
                    RoutingError::Delivery {
                        peer_id: id.clone(),
                        source,
                    }
                });
            }
        }

        Err(RoutingError::PeerNotFound(id.clone()))
    }

    /// Removes this connection from every room it belongs to.
    ///
    /// Memberships held by another connection with the same identifier are
    /// left alone. Returns the codes of the rooms that were left.
    pub fn evict(&self, peer: &Arc<Peer>) -> Vec<RoomCode> {
        let mut rooms = self.rooms.write();
        let mut left = Vec::new();

        rooms.retain(|code, room| {
            let mut members = room.members.lock();
            let is_member = members
                .get(peer.id())
                .is_some_and(|member| Arc::ptr_eq(member, peer));
            if !is_member {
                return true;
            }

            members.remove(peer.id());
            peer.clear_current_room_if(code);
            left.push(code.clone());
            info!("Peer {} left room {} ({} members)", peer.id(), code, members.len());

            if members.is_empty() {
                info!("Room {} deleted (empty)", code);
                return false;
            }
            true
        });

        left.sort();
        left
    }

    /// Codes of the rooms `id` is currently a member of.
    pub fn rooms_of(&self, id: &PeerId) -> Vec<RoomCode> {
        let rooms = self.rooms.read();
        let mut codes: Vec<RoomCode> = rooms
            .iter()
            .filter(|(_, room)| room.contains(id))
            .map(|(code, _)| code.clone())
            .collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.rooms.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.read().is_empty()
    }

    fn entry(rooms: &mut HashMap<RoomCode, Arc<Room>>, code: RoomCode) -> &Arc<Room> {
        rooms.entry(code).or_insert_with_key(|code| {
            info!("Room {} created", code);
            Arc::new(Room::new(code.clone()))
        })
    }

    fn withdraw<F>(&self, code: &RoomCode, id: &PeerId, matches: F) -> bool
    where
        F: FnOnce(&Arc<Peer>) -> bool,
    {
        let Some(room) = self.get_room(code) else {
            debug!("Leave of unknown room {} by {}", code, id);
            return false;
        };

        let (removed, now_empty) = room.dismiss(id, matches);
        if removed.is_none() {
            return false;
        }
        if now_empty {
            self.delete_if_empty(code, &room);
        }
        true
    }

    fn delete_if_empty(&self, code: &RoomCode, room: &Arc<Room>) {
        let mut rooms = self.rooms.write();

        // A join may have refilled the room between dismissal and here.
        let stale = rooms
            .get(code)
            .is_some_and(|current| Arc::ptr_eq(current, room) && current.is_empty());
        if stale {
            rooms.remove(code);
            info!("Room {} deleted (empty)", code);
        }
    }
}
