//! Room multiplexer: text rooms for message fan-out, voice rooms for calls.
//!
//! The two namespaces are independent; both are keyed by channel id.

use std::collections::{HashMap, HashSet};

use slayz_common::ConnectionId;

use crate::protocol::ServerEvent;
use crate::state::Outbound;

/// Live participants of one channel's call, in join order.
#[derive(Debug, Clone, Default)]
pub struct VoiceRoom {
    members: Vec<ConnectionId>,
}

impl VoiceRoom {
    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Text and voice rooms.
#[derive(Debug, Default)]
pub struct RoomMultiplexer {
    text: HashMap<String, HashSet<ConnectionId>>,
    voice: HashMap<String, VoiceRoom>,
}

impl RoomMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    // -- text ---------------------------------------------------------------

    /// Subscribe a connection to a channel's messages. Idempotent; returns
    /// false if it was already subscribed.
    pub fn subscribe_text(&mut self, channel_id: &str, id: &ConnectionId) -> bool {
        self.text
            .entry(channel_id.to_string())
            .or_default()
            .insert(id.clone())
    }

    /// Drop a connection from every text room, removing rooms left empty.
    pub fn unsubscribe_all(&mut self, id: &ConnectionId) {
        self.text.retain(|_, subscribers| {
            subscribers.remove(id);
            !subscribers.is_empty()
        });
    }

    pub fn text_subscribers(&self, channel_id: &str) -> Vec<ConnectionId> {
        self.text
            .get(channel_id)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// One delivery per current subscriber of `channel_id`, minus `exclude`.
    pub fn broadcast_text(
        &self,
        channel_id: &str,
        event: &ServerEvent,
        exclude: Option<&ConnectionId>,
    ) -> Vec<Outbound> {
        let Some(subscribers) = self.text.get(channel_id) else {
            return Vec::new();
        };
        subscribers
            .iter()
            .filter(|id| Some(*id) != exclude)
            .map(|id| Outbound::new(id.clone(), event.clone()))
            .collect()
    }

    // -- voice --------------------------------------------------------------

    /// Add a connection to a voice room, creating the room on first join.
    ///
    /// Returns the other participants as they were before this join. The
    /// snapshot and the insert happen in one step, so nobody can be both in
    /// the snapshot and announced later, or missing from both.
    pub fn join_voice(&mut self, channel_id: &str, id: &ConnectionId) -> Vec<ConnectionId> {
        let room = self.voice.entry(channel_id.to_string()).or_default();
        let others: Vec<ConnectionId> = room.members.iter().filter(|m| *m != id).cloned().collect();
        if !room.contains(id) {
            room.members.push(id.clone());
        }
        others
    }

    /// Remove a connection from a voice room, destroying the room once it
    /// is empty. Returns false if the connection was not a member.
    pub fn leave_voice(&mut self, channel_id: &str, id: &ConnectionId) -> bool {
        let Some(room) = self.voice.get_mut(channel_id) else {
            return false;
        };
        let before = room.members.len();
        room.members.retain(|m| m != id);
        let removed = room.members.len() != before;
        if room.is_empty() {
            self.voice.remove(channel_id);
        }
        removed
    }

    pub fn voice_room(&self, channel_id: &str) -> Option<&VoiceRoom> {
        self.voice.get(channel_id)
    }

    /// Current participants of a voice room, in join order.
    pub fn voice_members(&self, channel_id: &str) -> Vec<ConnectionId> {
        self.voice
            .get(channel_id)
            .map(|r| r.members.clone())
            .unwrap_or_default()
    }

    pub fn voice_room_count(&self) -> usize {
        self.voice.len()
    }

    /// One delivery per participant of `channel_id`, minus `exclude`.
    pub fn broadcast_voice(
        &self,
        channel_id: &str,
        event: &ServerEvent,
        exclude: Option<&ConnectionId>,
    ) -> Vec<Outbound> {
        let Some(room) = self.voice.get(channel_id) else {
            return Vec::new();
        };
        room.members
            .iter()
            .filter(|id| Some(*id) != exclude)
            .map(|id| Outbound::new(id.clone(), event.clone()))
            .collect()
    }
}
