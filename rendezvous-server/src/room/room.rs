use crate::peer::Peer;
use parking_lot::Mutex;
use rendezvous_core::{PeerId, RoomCode};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// A signaling room. Membership is guarded by the room's own lock.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    pub(super) members: Mutex<HashMap<PeerId, Arc<Peer>>>,
}

impl Room {
    pub(super) fn new(code: RoomCode) -> Self {
        Self {
            code,
            members: Mutex::new(HashMap::new()),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.members.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.lock().is_empty()
    }

    pub fn contains(&self, id: &PeerId) -> bool {
        self.members.lock().contains_key(id)
    }

    /// Member identifiers in ascending order.
    pub fn member_ids(&self) -> Vec<PeerId> {
        let mut ids: Vec<PeerId> = self.members.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub(super) fn admit(&self, peer: &Arc<Peer>) {
        let mut members = self.members.lock();
        peer.set_current_room(self.code.clone());
        members.insert(peer.id().clone(), Arc::clone(peer));
        info!("Peer {} joined room {} ({} members)", peer.id(), self.code, members.len());
    }

    /// Removes `id` if `matches` accepts the current member; returns the
    /// removed peer and whether the room is now empty.
    pub(super) fn dismiss<F>(&self, id: &PeerId, matches: F) -> (Option<Arc<Peer>>, bool)
    where
        F: FnOnce(&Arc<Peer>) -> bool,
    {
        let mut members = self.members.lock();
        if !members.get(id).is_some_and(matches) {
            return (None, members.is_empty());
        }

        let removed = members.remove(id);
        if let Some(peer) = &removed {
            peer.clear_current_room_if(&self.code);
            info!("Peer {} left room {} ({} members)", id, self.code, members.len());
        }
        (removed, members.is_empty())
    }
}
