use crate::lobby::{LobbyError, LobbyRoom};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rendezvous_core::RoomId;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::info;

/// Lobby rooms with an occupant ceiling. Shares nothing with signaling.
#[derive(Clone, Default)]
pub struct LobbyRegistry {
    rooms: Arc<DashMap<RoomId, LobbyRoom>>,
}

impl LobbyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, host: IpAddr, max_clients: u32) -> RoomId {
        let room = LobbyRoom::new(host, max_clients);
        let id = room.id;
        self.rooms.insert(id, room);
        info!("Lobby room {} created by {} (max {})", id, host, max_clients);
        id
    }

    /// Admits `client` unless the room is at capacity. Returns the updated room.
    pub fn join(&self, id: &RoomId, client: IpAddr) -> Result<LobbyRoom, LobbyError> {
        let mut room = self.rooms.get_mut(id).ok_or(LobbyError::RoomNotFound)?;
        if room.is_full() {
            return Err(LobbyError::RoomFull);
        }

        room.clients.push(client);
        info!(
            "Client {} joined lobby room {} ({}/{})",
            client,
            id,
            room.clients.len(),
            room.max_clients
        );
        Ok(room.value().clone())
    }

    /// Only the creating address may delete a room.
    pub fn delete(&self, id: &RoomId, caller: IpAddr) -> Result<(), LobbyError> {
        match self.rooms.entry(*id) {
            Entry::Vacant(_) => Err(LobbyError::RoomNotFound),
            Entry::Occupied(entry) if entry.get().host != caller => Err(LobbyError::NotHost),
            Entry::Occupied(entry) => {
                entry.remove();
                info!("Lobby room {} deleted by {}", id, caller);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &RoomId) -> Option<LobbyRoom> {
        self.rooms.get(id).map(|room| room.value().clone())
    }

    pub fn list(&self) -> Vec<LobbyRoom> {
        self.rooms.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
