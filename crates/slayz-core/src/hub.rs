//! The hub: single owner of [`CoreState`], shared by all connection tasks.
//!
//! Each state transition runs to completion under one lock, and its
//! outbound events are queued on the recipients' outboxes before the lock
//! is released, so every connection observes transitions in order.
//!
//! Outboxes are bounded. A connection that cannot keep up would silently
//! miss presence events and fall out of the mesh, so an overflowing
//! connection is disconnected within the same transition instead.

use std::sync::Arc;

use slayz_common::{ConnectionId, HubError};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::chat::MessageService;
use crate::protocol::{ClientEvent, ServerEvent, SignalKind};
use crate::registry::ConnectionRegistry;
use crate::state::{CoreState, Outbound, StateEvent};
use crate::store::{Authenticator, RecordStore};

/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct Hub {
    state: Arc<Mutex<CoreState>>,
    messages: Arc<MessageService>,
}

impl Hub {
    pub fn new(store: Arc<dyn RecordStore>, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CoreState::new())),
            messages: Arc::new(MessageService::new(store, auth)),
        }
    }

    /// Register a connection whose outgoing frames are queued on `outbox`.
    /// The first frame it receives is `connected` with its own id.
    pub async fn connect(&self, outbox: mpsc::Sender<String>) -> ConnectionId {
        let mut state = self.state.lock().await;
        let (id, hello) = state.connect(outbox);
        flush(&mut state, vec![hello]);
        info!(connection = %id, connections = state.registry.len(), "Client connected");
        id
    }

    /// Process one client event. Failures go back to `conn` as an `error`
    /// event and never propagate further.
    pub async fn handle(&self, conn: &ConnectionId, event: ClientEvent) {
        let name = event.name();
        if let Err(e) = self.dispatch(conn, event).await {
            match &e {
                HubError::Persistence(_) => error!(connection = %conn, event = name, error = %e, "Event failed"),
                _ => warn!(connection = %conn, event = name, error = %e, "Event rejected"),
            }
            self.report(conn, &e).await;
        }
    }

    /// Process one client event, returning the failure instead of reporting it.
    pub async fn dispatch(&self, conn: &ConnectionId, event: ClientEvent) -> Result<(), HubError> {
        let transition = match event {
            ClientEvent::SendMessage {
                channel_id,
                message,
                token,
            } => {
                // Runs outside the lock: the store is the only thing that suspends.
                let (message, author) = self
                    .messages
                    .submit(channel_id.as_deref(), message.as_deref(), token.as_deref())
                    .await?;
                StateEvent::Publish { message, author }
            }
            ClientEvent::JoinChannel(channel_id) => StateEvent::JoinChannel { channel_id },
            ClientEvent::JoinVoice {
                channel_id,
                user_id,
                username,
            } => StateEvent::JoinVoice {
                channel_id,
                user_id,
                username,
            },
            ClientEvent::LeaveVoice => StateEvent::LeaveVoice,
            ClientEvent::Offer { target, offer } => StateEvent::Signal {
                kind: SignalKind::Offer,
                target,
                payload: offer,
            },
            ClientEvent::Answer { target, answer } => StateEvent::Signal {
                kind: SignalKind::Answer,
                target,
                payload: answer,
            },
            ClientEvent::IceCandidate { target, candidate } => StateEvent::Signal {
                kind: SignalKind::IceCandidate,
                target,
                payload: candidate,
            },
            ClientEvent::StartScreenShare { channel_id } => StateEvent::ScreenShare {
                channel_id,
                started: true,
            },
            ClientEvent::StopScreenShare { channel_id } => StateEvent::ScreenShare {
                channel_id,
                started: false,
            },
        };
        self.commit(conn, transition).await
    }

    /// Send an `error` event to `conn` alone.
    pub async fn report(&self, conn: &ConnectionId, err: &HubError) {
        let mut state = self.state.lock().await;
        flush(
            &mut state,
            vec![Outbound::new(
                conn.clone(),
                ServerEvent::Error {
                    message: err.client_message(),
                },
            )],
        );
    }

    /// Transport teardown. Idempotent.
    pub async fn disconnect(&self, conn: &ConnectionId) {
        let mut state = self.state.lock().await;
        let out = state.disconnect(conn);
        flush(&mut state, out);
        info!(connection = %conn, connections = state.registry.len(), "Client disconnected");
    }

    /// Participants of a voice room, in join order.
    pub async fn voice_members(&self, channel_id: &str) -> Vec<ConnectionId> {
        self.state.lock().await.rooms.voice_members(channel_id)
    }

    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    async fn commit(&self, conn: &ConnectionId, event: StateEvent) -> Result<(), HubError> {
        let mut state = self.state.lock().await;
        let out = state.apply(conn, event)?;
        flush(&mut state, out);
        Ok(())
    }
}

/// Deliver `outbound`, then disconnect every recipient whose outbox
/// overflowed and deliver the fallout of that, until nothing is left.
/// Terminates because each round unregisters at least one connection.
fn flush(state: &mut CoreState, outbound: Vec<Outbound>) {
    let mut pending = outbound;
    while !pending.is_empty() {
        let overflowed = deliver(&state.registry, pending);
        pending = Vec::new();
        for conn in overflowed {
            warn!(connection = %conn, "Outbox full, disconnecting client");
            pending.extend(state.disconnect(&conn));
        }
    }
}

/// Queue each event on its recipient's outbox without waiting. Returns the
/// recipients whose outbox was full; a closed outbox just loses the frame.
fn deliver(registry: &ConnectionRegistry, outbound: Vec<Outbound>) -> Vec<ConnectionId> {
    let mut overflowed: Vec<ConnectionId> = Vec::new();
    for Outbound { to, event } in outbound {
        let Some(conn) = registry.get(&to) else {
            debug!(connection = %to, "Recipient gone, dropping event");
            continue;
        };
        let frame = match serde_json::to_string(&event) {
            Ok(frame) => frame,
            Err(e) => {
                error!(connection = %to, error = %e, "Failed to encode event");
                continue;
            }
        };
        match conn.outbox().try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                if !overflowed.contains(&to) {
                    overflowed.push(to);
                }
            }
            Err(TrySendError::Closed(_)) => {
                debug!(connection = %to, "Outbox closed, dropping event");
            }
        }
    }
    overflowed
}
