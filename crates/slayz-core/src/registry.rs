//! Connection registry: live connection → claimed identity and voice membership.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use slayz_common::ConnectionId;
use tokio::sync::mpsc;

/// Identity asserted by a client event (or resolved from a token).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub username: String,
}

/// One live client connection.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: Option<Identity>,
    /// Voice room (channel id) this connection is in, if any.
    pub voice_room: Option<String>,
    /// Screen-share flag, only meaningful while in a voice room.
    pub sharing_screen: bool,
    outbox: mpsc::Sender<String>,
}

impl Connection {
    pub fn outbox(&self) -> &mpsc::Sender<String> {
        &self.outbox
    }
}

/// All live connections keyed by id.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection whose frames go to `outbox`.
    pub fn register(&mut self, outbox: mpsc::Sender<String>) -> ConnectionId {
        let id = ConnectionId::new();
        self.connections.insert(
            id.clone(),
            Connection {
                id: id.clone(),
                identity: None,
                voice_room: None,
                sharing_screen: false,
                outbox,
            },
        );
        id
    }

    /// Returns false if the connection is not registered.
    pub fn set_identity(&mut self, id: &ConnectionId, user_id: &str, username: &str) -> bool {
        match self.connections.get_mut(id) {
            Some(conn) => {
                conn.identity = Some(Identity {
                    user_id: user_id.to_string(),
                    username: username.to_string(),
                });
                true
            }
            None => false,
        }
    }

    /// Setting the room to `None` also clears the screen-share flag.
    pub fn set_voice_room(&mut self, id: &ConnectionId, channel_id: Option<&str>) -> bool {
        match self.connections.get_mut(id) {
            Some(conn) => {
                conn.voice_room = channel_id.map(str::to_string);
                if conn.voice_room.is_none() {
                    conn.sharing_screen = false;
                }
                true
            }
            None => false,
        }
    }

    pub fn set_sharing_screen(&mut self, id: &ConnectionId, sharing: bool) {
        if let Some(conn) = self.connections.get_mut(id) {
            conn.sharing_screen = sharing;
        }
    }

    pub fn identity_of(&self, id: &ConnectionId) -> Option<&Identity> {
        self.connections.get(id)?.identity.as_ref()
    }

    pub fn voice_room_of(&self, id: &ConnectionId) -> Option<&str> {
        self.connections.get(id)?.voice_room.as_deref()
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Remove a connection from the registry.
    ///
    /// Only the registry entry goes away here; voice and text room cleanup
    /// is driven by [`crate::CoreState`] before this is called.
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<Connection> {
        self.connections.remove(id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbox() -> mpsc::Sender<String> {
        mpsc::channel(4).0
    }

    #[test]
    fn register_assigns_unique_ids() {
        let mut reg = ConnectionRegistry::new();
        let a = reg.register(outbox());
        let b = reg.register(outbox());
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
        assert!(reg.identity_of(&a).is_none());
        assert!(reg.voice_room_of(&a).is_none());
    }

    #[test]
    fn identity_round_trip() {
        let mut reg = ConnectionRegistry::new();
        let a = reg.register(outbox());
        assert!(reg.set_identity(&a, "u1", "alice"));
        let identity = reg.identity_of(&a).unwrap();
        assert_eq!(identity.user_id, "u1");
        assert_eq!(identity.username, "alice");
    }

    #[test]
    fn unknown_connection_is_not_mutated() {
        let mut reg = ConnectionRegistry::new();
        let ghost = ConnectionId::from("ghost");
        assert!(!reg.set_identity(&ghost, "u1", "alice"));
        assert!(!reg.set_voice_room(&ghost, Some("v1")));
        assert!(reg.is_empty());
    }

    #[test]
    fn leaving_voice_clears_screen_share() {
        let mut reg = ConnectionRegistry::new();
        let a = reg.register(outbox());
        reg.set_voice_room(&a, Some("v1"));
        reg.set_sharing_screen(&a, true);
        assert!(reg.get(&a).unwrap().sharing_screen);

        reg.set_voice_room(&a, None);
        assert!(!reg.get(&a).unwrap().sharing_screen);
        assert!(reg.voice_room_of(&a).is_none());
    }

    #[test]
    fn unregister_removes_entry() {
        let mut reg = ConnectionRegistry::new();
        let a = reg.register(outbox());
        assert!(reg.unregister(&a).is_some());
        assert!(!reg.contains(&a));
        assert!(reg.unregister(&a).is_none());
    }
}
