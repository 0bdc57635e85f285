mod error;
mod http;
mod lobby;
mod peer;
mod room;
mod signaling;
mod transport;

pub use error::*;
pub use http::*;
pub use lobby::*;
pub use peer::*;
pub use room::*;
pub use signaling::*;
pub use transport::*;
