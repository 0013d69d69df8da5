//! Voice session lifecycle.
//!
//! Drives joining and leaving calls, disconnect cleanup and screen-share
//! presence on top of the registry and the voice rooms. Media itself is
//! peer-to-peer; this module only keeps membership straight.

mod manager;
mod types;

pub use types::VoiceState;
