//! Wire protocol for the client connection.
//!
//! Every frame is a JSON text frame `{"event": <name>, "data": <payload>}`.
//! Signaling payloads (`offer`, `answer`, `candidate`) are carried as raw
//! JSON values and never inspected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use slayz_common::ConnectionId;

use crate::chat::ChatMessage;

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Subscribe to the text room of a channel.
    JoinChannel(String),
    JoinVoice {
        channel_id: String,
        user_id: String,
        username: String,
    },
    LeaveVoice,
    /// Fields are optional on the wire so a partial submission is reported
    /// as a validation error instead of a malformed frame.
    SendMessage {
        #[serde(default)]
        channel_id: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        token: Option<String>,
    },
    Offer {
        target: ConnectionId,
        #[serde(default)]
        offer: Value,
    },
    Answer {
        target: ConnectionId,
        #[serde(default)]
        answer: Value,
    },
    #[serde(rename = "ice-candidate")]
    IceCandidate {
        target: ConnectionId,
        #[serde(default)]
        candidate: Value,
    },
    StartScreenShare {
        channel_id: String,
    },
    StopScreenShare {
        channel_id: String,
    },
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinChannel(_) => "joinChannel",
            ClientEvent::JoinVoice { .. } => "joinVoice",
            ClientEvent::LeaveVoice => "leaveVoice",
            ClientEvent::SendMessage { .. } => "sendMessage",
            ClientEvent::Offer { .. } => SignalKind::Offer.event_name(),
            ClientEvent::Answer { .. } => SignalKind::Answer.event_name(),
            ClientEvent::IceCandidate { .. } => SignalKind::IceCandidate.event_name(),
            ClientEvent::StartScreenShare { .. } => "startScreenShare",
            ClientEvent::StopScreenShare { .. } => "stopScreenShare",
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A call participant as seen by other clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub socket_id: ConnectionId,
}

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// First frame on every connection: tells the client its own id.
    Connected {
        socket_id: ConnectionId,
    },
    NewMessage(ChatMessage),
    UserJoinedVoice(Participant),
    UserLeftVoice(Participant),
    /// Pre-join snapshot, sent only to the connection that just joined.
    UsersInCall(Vec<Participant>),
    Offer {
        offer: Value,
        sender: ConnectionId,
        user_id: Option<String>,
        username: Option<String>,
    },
    Answer {
        answer: Value,
        sender: ConnectionId,
        user_id: Option<String>,
        username: Option<String>,
    },
    #[serde(rename = "ice-candidate")]
    IceCandidate {
        candidate: Value,
        sender: ConnectionId,
        user_id: Option<String>,
        username: Option<String>,
    },
    UserStartedScreenShare(Participant),
    UserStoppedScreenShare(Participant),
    Error {
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Signaling
// ---------------------------------------------------------------------------

/// The three kinds of point-to-point WebRTC signaling messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn event_name(self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
        }
    }
}
