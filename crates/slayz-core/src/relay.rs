//! Point-to-point WebRTC signaling relay.
//!
//! Offers, answers and ICE candidates go to exactly the named target, or
//! nowhere when the target is gone. Payloads are forwarded untouched.

use serde_json::Value;
use slayz_common::ConnectionId;
use tracing::debug;

use crate::protocol::{ServerEvent, SignalKind};
use crate::registry::{ConnectionRegistry, Identity};
use crate::state::Outbound;

/// A signaling message in flight. Never stored.
#[derive(Debug, Clone)]
pub struct SignalEnvelope {
    pub kind: SignalKind,
    pub sender: ConnectionId,
    pub sender_identity: Option<Identity>,
    pub target: ConnectionId,
    pub payload: Value,
}

impl SignalEnvelope {
    /// The event the target receives, annotated with the sender.
    pub fn into_event(self) -> ServerEvent {
        let user_id = self.sender_identity.as_ref().map(|i| i.user_id.clone());
        let username = self.sender_identity.map(|i| i.username);
        let sender = self.sender;
        match self.kind {
            SignalKind::Offer => ServerEvent::Offer {
                offer: self.payload,
                sender,
                user_id,
                username,
            },
            SignalKind::Answer => ServerEvent::Answer {
                answer: self.payload,
                sender,
                user_id,
                username,
            },
            SignalKind::IceCandidate => ServerEvent::IceCandidate {
                candidate: self.payload,
                sender,
                user_id,
                username,
            },
        }
    }
}

/// Outcome of a relay attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Delivered(Outbound),
    /// Target not registered. Not an error: WebRTC clients time out
    /// unanswered offers on their own.
    Dropped { target: ConnectionId },
}

/// Route `envelope` to its target if that connection is live.
pub fn relay(registry: &ConnectionRegistry, envelope: SignalEnvelope) -> Delivery {
    if !registry.contains(&envelope.target) {
        debug!(
            kind = envelope.kind.event_name(),
            sender = %envelope.sender,
            target = %envelope.target,
            "Signal dropped: target not connected"
        );
        return Delivery::Dropped {
            target: envelope.target,
        };
    }

    debug!(
        kind = envelope.kind.event_name(),
        sender = %envelope.sender,
        target = %envelope.target,
        "Relaying signal"
    );
    let target = envelope.target.clone();
    Delivery::Delivered(Outbound::new(target, envelope.into_event()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn envelope(kind: SignalKind, sender: &ConnectionId, target: &ConnectionId) -> SignalEnvelope {
        SignalEnvelope {
            kind,
            sender: sender.clone(),
            sender_identity: Some(Identity {
                user_id: "u1".into(),
                username: "alice".into(),
            }),
            target: target.clone(),
            payload: json!({"type": "offer", "sdp": "v=0\r\no=- 1 2 IN IP4 127.0.0.1"}),
        }
    }

    #[test]
    fn delivers_only_to_target_with_sender_annotation() {
        let mut registry = ConnectionRegistry::new();
        let a = registry.register(mpsc::channel(1).0);
        let b = registry.register(mpsc::channel(1).0);

        match relay(&registry, envelope(SignalKind::Offer, &a, &b)) {
            Delivery::Delivered(out) => {
                assert_eq!(out.to, b);
                match out.event {
                    ServerEvent::Offer {
                        offer,
                        sender,
                        user_id,
                        username,
                    } => {
                        assert_eq!(sender, a);
                        assert_eq!(user_id.as_deref(), Some("u1"));
                        assert_eq!(username.as_deref(), Some("alice"));
                        assert_eq!(offer["sdp"], "v=0\r\no=- 1 2 IN IP4 127.0.0.1");
                    }
                    other => panic!("unexpected event {other:?}"),
                }
            }
            other => panic!("expected delivery, got {other:?}"),
        }
    }

    #[test]
    fn missing_target_is_dropped() {
        let mut registry = ConnectionRegistry::new();
        let a = registry.register(mpsc::channel(1).0);
        let ghost = ConnectionId::from("ghost");

        let delivery = relay(&registry, envelope(SignalKind::Answer, &a, &ghost));
        assert_eq!(delivery, Delivery::Dropped { target: ghost });
    }

    #[test]
    fn kind_selects_event() {
        let mut registry = ConnectionRegistry::new();
        let a = registry.register(mpsc::channel(1).0);
        let b = registry.register(mpsc::channel(1).0);

        let Delivery::Delivered(out) = relay(&registry, envelope(SignalKind::IceCandidate, &a, &b))
        else {
            panic!("expected delivery");
        };
        assert!(matches!(out.event, ServerEvent::IceCandidate { .. }));

        let Delivery::Delivered(out) = relay(&registry, envelope(SignalKind::Answer, &a, &b)) else {
            panic!("expected delivery");
        };
        assert!(matches!(out.event, ServerEvent::Answer { .. }));
    }

    #[test]
    fn payload_is_forwarded_verbatim() {
        let mut registry = ConnectionRegistry::new();
        let a = registry.register(mpsc::channel(1).0);
        let b = registry.register(mpsc::channel(1).0);
        let mut env = envelope(SignalKind::IceCandidate, &a, &b);
        // Not a valid candidate; the relay must not care.
        env.payload = json!(["anything", 42, null]);

        let Delivery::Delivered(out) = relay(&registry, env) else {
            panic!("expected delivery");
        };
        let ServerEvent::IceCandidate { candidate, .. } = out.event else {
            panic!("expected ice-candidate");
        };
        assert_eq!(candidate, json!(["anything", 42, null]));
    }
}
