mod lobby_error;
mod lobby_handler;
mod lobby_registry;
mod lobby_room;

pub use lobby_error::*;
pub use lobby_handler::*;
pub use lobby_registry::*;
pub use lobby_room::*;
