use crate::message::Presence;
use crate::{ConnectionId, CursorDelta, CursorState};
use std::collections::HashMap;

/// Presence table for the session: every named participant and its live
/// cursor, keyed by connection id. Entries exist from `setName` until
/// disconnect; there is no tombstoning.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: HashMap<ConnectionId, CursorState>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self {
            participants: HashMap::new(),
        }
    }

    /// Registers a participant under the given display name with its cursor
    /// at the origin. Re-invocation for a known connection only overwrites
    /// the name.
    pub fn join(&mut self, connection_id: ConnectionId, name: &str) {
        let participant = self
            .participants
            .entry(connection_id)
            .or_insert_with(CursorState::default);
        participant.name = Some(name.to_owned());
    }

    /// Shallow-merges a cursor delta. Returns false (and changes nothing)
    /// when the connection is unknown — cursor events legitimately race
    /// `setName` and disconnect, so this is not an error.
    pub fn update_cursor(&mut self, connection_id: ConnectionId, delta: &CursorDelta) -> bool {
        if let Some(cursor) = self.participants.get_mut(&connection_id) {
            cursor.apply(delta);
            true
        } else {
            log::debug!("cursor update from unregistered connection {}", connection_id);
            false
        }
    }

    /// Removes the participant, reporting whether one existed.
    pub fn leave(&mut self, connection_id: ConnectionId) -> bool {
        self.participants.remove(&connection_id).is_some()
    }

    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.participants.contains_key(&connection_id)
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<&CursorState> {
        self.participants.get(&connection_id)
    }

    pub fn connection_ids(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.participants.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Full presence table for broadcast. Consumers key by connection id;
    /// iteration order is irrelevant.
    pub fn snapshot(&self) -> Presence {
        self.participants.clone()
    }
}
