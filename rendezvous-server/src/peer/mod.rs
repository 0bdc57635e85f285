mod peer;
mod peer_registry;

pub use peer::*;
pub use peer_registry::*;
