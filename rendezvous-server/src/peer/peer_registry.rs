use crate::peer::Peer;
use parking_lot::RwLock;
use rendezvous_core::PeerId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Live peers by identifier. Lookups share the lock, mutations exclude them.
#[derive(Clone, Default)]
pub struct PeerRegistry {
    peers: Arc<RwLock<HashMap<PeerId, Arc<Peer>>>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `peer`, replacing any entry with the same identifier.
    ///
    /// The displaced peer is returned but its channel is left open: a
    /// reconnecting client may still be draining the old socket.
    pub fn add(&self, peer: Arc<Peer>) -> Option<Arc<Peer>> {
        let mut peers = self.peers.write();
        let id = peer.id().clone();
        let displaced = peers.insert(id.clone(), peer);

        if displaced.is_some() {
            warn!("Peer {} registered twice, previous connection displaced", id);
        }
        info!("Peer {} added ({} total)", id, peers.len());

        displaced
    }

    /// Removes the entry and closes its channel. No-op for unknown ids.
    pub fn remove(&self, id: &PeerId) -> bool {
        let mut peers = self.peers.write();

        let Some(peer) = peers.remove(id) else {
            warn!("Peer {} not found in registry", id);
            return false;
        };
        peer.close();
        info!("Peer {} removed ({} total)", id, peers.len());
        true
    }

    /// Tears down one connection.
    ///
    /// The entry is removed only if it still refers to this very connection,
    /// so a displaced connection never unregisters its successor. The
    /// connection's own channel is closed either way.
    pub fn release(&self, peer: &Arc<Peer>) {
        let mut peers = self.peers.write();

        let current = peers
            .get(peer.id())
            .is_some_and(|entry| Arc::ptr_eq(entry, peer));
        if current {
            peers.remove(peer.id());
            info!("Peer {} removed ({} total)", peer.id(), peers.len());
        }
        peer.close();
    }

    pub fn get(&self, id: &PeerId) -> Option<Arc<Peer>> {
        self.peers.read().get(id).cloned()
    }

    pub fn contains(&self, id: &PeerId) -> bool {
        self.peers.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}
