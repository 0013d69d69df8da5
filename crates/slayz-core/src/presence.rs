//! Presence events for voice rooms.
//!
//! Every call participant's client rebuilds its part of the mesh from these.

use slayz_common::ConnectionId;

use crate::protocol::{Participant, ServerEvent};
use crate::registry::ConnectionRegistry;
use crate::rooms::RoomMultiplexer;
use crate::state::Outbound;

/// How `conn` is presented to other clients.
pub fn participant(registry: &ConnectionRegistry, conn: &ConnectionId) -> Participant {
    let identity = registry.identity_of(conn);
    Participant {
        user_id: identity.map(|i| i.user_id.clone()),
        username: identity.map(|i| i.username.clone()),
        socket_id: conn.clone(),
    }
}

/// `userJoinedVoice` to everyone in the room except the joiner.
pub fn user_joined(
    rooms: &RoomMultiplexer,
    registry: &ConnectionRegistry,
    channel_id: &str,
    conn: &ConnectionId,
) -> Vec<Outbound> {
    let event = ServerEvent::UserJoinedVoice(participant(registry, conn));
    rooms.broadcast_voice(channel_id, &event, Some(conn))
}

/// `userLeftVoice` to the members still in the room.
pub fn user_left(
    rooms: &RoomMultiplexer,
    registry: &ConnectionRegistry,
    channel_id: &str,
    conn: &ConnectionId,
) -> Vec<Outbound> {
    let event = ServerEvent::UserLeftVoice(participant(registry, conn));
    rooms.broadcast_voice(channel_id, &event, Some(conn))
}

/// `usersInCall` for the joiner only, built from a pre-join snapshot.
pub fn users_in_call(
    registry: &ConnectionRegistry,
    conn: &ConnectionId,
    snapshot: &[ConnectionId],
) -> Outbound {
    let users = snapshot
        .iter()
        .filter(|id| registry.contains(id))
        .map(|id| participant(registry, id))
        .collect();
    Outbound::new(conn.clone(), ServerEvent::UsersInCall(users))
}

pub fn screen_share(
    rooms: &RoomMultiplexer,
    registry: &ConnectionRegistry,
    channel_id: &str,
    conn: &ConnectionId,
    started: bool,
) -> Vec<Outbound> {
    let who = participant(registry, conn);
    let event = if started {
        ServerEvent::UserStartedScreenShare(who)
    } else {
        ServerEvent::UserStoppedScreenShare(who)
    };
    rooms.broadcast_voice(channel_id, &event, Some(conn))
}
