mod connect_params;
mod router;
mod ws_handler;

pub use connect_params::*;
pub use router::*;
pub use ws_handler::*;
