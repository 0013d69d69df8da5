pub mod errors;
pub mod id;

pub use errors::{ConfigError, HubError, StoreError};
pub use id::{new_id, ConnectionId};
