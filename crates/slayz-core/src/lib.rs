//! Real-time coordination core for slayz.
//!
//! Tracks live connections, text and voice rooms, and relays WebRTC
//! signaling between call participants so every client can build a full
//! mesh of peer connections. Media never passes through here.
//!
//! All shared state lives in one [`CoreState`] owned by the [`Hub`], and
//! every inbound event is applied to it under a single lock.

pub mod chat;
pub mod hub;
pub mod presence;
pub mod protocol;
pub mod registry;
pub mod relay;
pub mod rooms;
pub mod state;
pub mod store;
pub mod voice;

pub use chat::{ChatMessage, MessageService};
pub use hub::Hub;
pub use protocol::{ClientEvent, Participant, ServerEvent, SignalKind};
pub use registry::{Connection, ConnectionRegistry, Identity};
pub use relay::{Delivery, SignalEnvelope};
pub use rooms::RoomMultiplexer;
pub use state::{CoreState, Outbound, StateEvent};
pub use store::{Authenticator, RecordStore};
pub use voice::VoiceState;
