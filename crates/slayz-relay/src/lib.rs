//! slayz-relay: WebSocket front end for the slayz coordination hub.
//!
//! Accepts WebSocket connections, turns each JSON text frame into a hub
//! event, and writes whatever the hub queues for the connection back out.

pub mod cli;
pub mod connection;
pub mod server;

pub use server::{build_hub, serve};
