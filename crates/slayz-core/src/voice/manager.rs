//! Voice session transitions on [`CoreState`]: join, leave, screen share.

use slayz_common::{ConnectionId, HubError};
use tracing::{debug, info};

use super::types::VoiceState;
use crate::presence;
use crate::state::{CoreState, Outbound};

impl CoreState {
    pub fn voice_state(&self, conn: &ConnectionId) -> VoiceState {
        match self.registry.voice_room_of(conn) {
            Some(channel_id) => VoiceState::InVoice(channel_id.to_string()),
            None => VoiceState::Idle,
        }
    }

    /// `Idle → InVoice(channel_id)`, leaving any other call first.
    ///
    /// Everyone already in the room hears `userJoinedVoice`; the joiner alone
    /// gets `usersInCall` with the pre-join snapshot.
    pub(crate) fn join_voice(
        &mut self,
        conn: &ConnectionId,
        channel_id: &str,
        user_id: &str,
        username: &str,
    ) -> Result<Vec<Outbound>, HubError> {
        if channel_id.trim().is_empty() {
            return Err(HubError::Validation("channel id required".into()));
        }
        if user_id.trim().is_empty() {
            return Err(HubError::Validation("user id required".into()));
        }
        self.require_live(conn)?;

        let mut out = Vec::new();
        match self.voice_state(conn) {
            VoiceState::InVoice(current) if current == channel_id => {
                // Already here: refresh identity and resend the roster only.
                self.registry.set_identity(conn, user_id, username);
                let others = self.rooms.join_voice(channel_id, conn);
                out.push(presence::users_in_call(&self.registry, conn, &others));
                debug!(connection = %conn, channel = %channel_id, "Repeated voice join");
                return Ok(out);
            }
            VoiceState::InVoice(_) => out.extend(self.leave_voice(conn)),
            VoiceState::Idle => {}
        }

        self.registry.set_identity(conn, user_id, username);
        let others = self.rooms.join_voice(channel_id, conn);
        self.registry.set_voice_room(conn, Some(channel_id));

        out.extend(presence::user_joined(
            &self.rooms,
            &self.registry,
            channel_id,
            conn,
        ));
        out.push(presence::users_in_call(&self.registry, conn, &others));

        info!(
            connection = %conn,
            channel = %channel_id,
            user_id,
            participants = others.len() + 1,
            "User joined voice"
        );
        Ok(out)
    }

    /// `InVoice → Idle`. A no-op for a connection that is already idle or
    /// unknown, which makes disconnect after an explicit leave harmless.
    pub(crate) fn leave_voice(&mut self, conn: &ConnectionId) -> Vec<Outbound> {
        let Some(channel_id) = self.registry.voice_room_of(conn).map(str::to_string) else {
            return Vec::new();
        };

        self.rooms.leave_voice(&channel_id, conn);
        self.registry.set_voice_room(conn, None);

        let out = presence::user_left(&self.rooms, &self.registry, &channel_id, conn);
        info!(
            connection = %conn,
            channel = %channel_id,
            remaining = self.rooms.voice_members(&channel_id).len(),
            "User left voice"
        );
        out
    }

    /// Announce a screen-share start/stop to the named voice room, minus the
    /// sender. The flag is only recorded when the sender is in that room.
    pub(crate) fn screen_share(
        &mut self,
        conn: &ConnectionId,
        channel_id: &str,
        started: bool,
    ) -> Result<Vec<Outbound>, HubError> {
        if channel_id.trim().is_empty() {
            return Err(HubError::Validation("channel id required".into()));
        }
        self.require_live(conn)?;

        if self.registry.voice_room_of(conn) == Some(channel_id) {
            self.registry.set_sharing_screen(conn, started);
        }
        debug!(connection = %conn, channel = %channel_id, started, "Screen share");
        Ok(presence::screen_share(
            &self.rooms,
            &self.registry,
            channel_id,
            conn,
            started,
        ))
    }
}
