use crate::ConnectionId;

/// Holder of the single "admin" flag. The role is informational (clients use
/// it to mark the session's primary participant); it grants no server-side
/// privilege.
#[derive(Debug, Default)]
pub struct AdminElection {
    admin: Option<ConnectionId>,
}

impl AdminElection {
    pub fn new() -> Self {
        Self { admin: None }
    }

    pub fn current(&self) -> Option<ConnectionId> {
        self.admin
    }

    /// Grants admin to the given connection when the role is vacant. Returns
    /// whether a grant happened, so the caller can notify the new admin.
    pub fn elect_if_unset(&mut self, connection_id: ConnectionId) -> bool {
        if self.admin.is_none() {
            self.admin = Some(connection_id);
            true
        } else {
            false
        }
    }

    /// Reassigns the role when its holder departs: the smallest remaining
    /// connection id becomes admin (deterministic, and with monotonic id
    /// assignment it is the longest-connected participant). Returns the heir
    /// so the caller can notify it; `None` when the departing connection was
    /// not admin or no participants remain.
    pub fn on_departure(
        &mut self,
        connection_id: ConnectionId,
        remaining: impl Iterator<Item = ConnectionId>,
    ) -> Option<ConnectionId> {
        if self.admin != Some(connection_id) {
            return None;
        }
        self.admin = remaining.min();
        self.admin
    }
}
