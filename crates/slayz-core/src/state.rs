//! Shared coordination state and the event → transition dispatch.
//!
//! [`CoreState::apply`] is a pure state transition: it mutates the registry
//! and rooms and returns the events to deliver, without doing any I/O.
//! The [`crate::Hub`] runs it under its lock and performs delivery.

use serde_json::Value;
use slayz_common::{ConnectionId, HubError};
use tokio::sync::mpsc;
use tracing::debug;

use crate::chat::ChatMessage;
use crate::protocol::{ServerEvent, SignalKind};
use crate::registry::{ConnectionRegistry, Identity};
use crate::relay::{self, Delivery, SignalEnvelope};
use crate::rooms::RoomMultiplexer;

/// One event addressed to one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(to: ConnectionId, event: ServerEvent) -> Self {
        Self { to, event }
    }
}

/// Inputs that mutate (or read) shared state.
#[derive(Debug, Clone)]
pub enum StateEvent {
    JoinChannel {
        channel_id: String,
    },
    JoinVoice {
        channel_id: String,
        user_id: String,
        username: String,
    },
    LeaveVoice,
    Signal {
        kind: SignalKind,
        target: ConnectionId,
        payload: Value,
    },
    ScreenShare {
        channel_id: String,
        started: bool,
    },
    /// Fan out a message that has already been persisted.
    Publish {
        message: ChatMessage,
        author: Identity,
    },
    Disconnect,
}

/// Registry plus rooms. Owned by exactly one [`crate::Hub`].
#[derive(Debug, Default)]
pub struct CoreState {
    pub registry: ConnectionRegistry,
    pub rooms: RoomMultiplexer,
}

impl CoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and greet it with its own id.
    pub fn connect(&mut self, outbox: mpsc::Sender<String>) -> (ConnectionId, Outbound) {
        let id = self.registry.register(outbox);
        let hello = Outbound::new(
            id.clone(),
            ServerEvent::Connected {
                socket_id: id.clone(),
            },
        );
        (id, hello)
    }

    /// Apply one event from `conn`.
    ///
    /// On `Err` nothing has been mutated.
    pub fn apply(&mut self, conn: &ConnectionId, event: StateEvent) -> Result<Vec<Outbound>, HubError> {
        match event {
            StateEvent::JoinChannel { channel_id } => {
                if channel_id.trim().is_empty() {
                    return Err(HubError::Validation("channel id required".into()));
                }
                self.require_live(conn)?;
                if self.rooms.subscribe_text(&channel_id, conn) {
                    debug!(connection = %conn, channel = %channel_id, "Subscribed to text room");
                }
                Ok(Vec::new())
            }
            StateEvent::JoinVoice {
                channel_id,
                user_id,
                username,
            } => self.join_voice(conn, &channel_id, &user_id, &username),
            StateEvent::LeaveVoice => Ok(self.leave_voice(conn)),
            StateEvent::Signal {
                kind,
                target,
                payload,
            } => {
                let envelope = SignalEnvelope {
                    kind,
                    sender: conn.clone(),
                    sender_identity: self.registry.identity_of(conn).cloned(),
                    target,
                    payload,
                };
                Ok(match relay::relay(&self.registry, envelope) {
                    Delivery::Delivered(out) => vec![out],
                    Delivery::Dropped { .. } => Vec::new(),
                })
            }
            StateEvent::ScreenShare {
                channel_id,
                started,
            } => self.screen_share(conn, &channel_id, started),
            StateEvent::Publish { message, author } => Ok(self.publish(conn, message, author)),
            StateEvent::Disconnect => Ok(self.disconnect(conn)),
        }
    }

    pub(crate) fn require_live(&self, conn: &ConnectionId) -> Result<(), HubError> {
        if self.registry.contains(conn) {
            Ok(())
        } else {
            Err(HubError::NotFound(format!("connection {conn} is not registered")))
        }
    }

    /// Fan a persisted message out to its channel's text room, sender included.
    fn publish(&mut self, conn: &ConnectionId, message: ChatMessage, author: Identity) -> Vec<Outbound> {
        if self.registry.identity_of(conn).is_none() {
            self.registry
                .set_identity(conn, &author.user_id, &author.username);
        }
        let channel_id = message.channel_id.clone();
        self.rooms
            .broadcast_text(&channel_id, &ServerEvent::NewMessage(message), None)
    }

    /// Transport teardown: leave any voice room, drop text subscriptions,
    /// then forget the connection. Safe to call more than once.
    pub fn disconnect(&mut self, conn: &ConnectionId) -> Vec<Outbound> {
        let out = self.leave_voice(conn);
        self.rooms.unsubscribe_all(conn);
        self.registry.unregister(conn);
        out
    }
}
