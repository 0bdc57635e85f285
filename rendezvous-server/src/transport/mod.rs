mod peer_channel;
mod signal_source;
mod websocket;

pub use peer_channel::*;
pub use signal_source::*;
pub use websocket::*;
