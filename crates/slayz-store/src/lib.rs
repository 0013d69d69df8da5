//! Record store backends and token authentication for slayz.

pub mod auth;
pub mod json_file;
pub mod memory;

pub use auth::TokenAuthenticator;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
