use rendezvous_core::RoomId;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A lobby room. The creator is counted as the first client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyRoom {
    pub id: RoomId,
    pub host: IpAddr,
    pub max_clients: u32,
    pub clients: Vec<IpAddr>,
}

impl LobbyRoom {
    pub fn new(host: IpAddr, max_clients: u32) -> Self {
        Self {
            id: RoomId::new(),
            host,
            max_clients,
            clients: vec![host],
        }
    }

    pub fn is_full(&self) -> bool {
        self.clients.len() >= self.max_clients as usize
    }
}
