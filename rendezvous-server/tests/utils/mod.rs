pub mod mock_source;

pub use mock_source::*;
pub use test_peer::*;
pub use wait_helpers::*;
