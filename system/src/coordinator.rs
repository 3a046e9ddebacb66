use std::num::Wrapping;

use crate::document_store::DocumentStore;
use crate::election::AdminElection;
use crate::message::{ClientEvent, Outbound, Recipients, SessionEvent};
use crate::registry::ParticipantRegistry;
use crate::{ConnectionId, CursorDelta, Document};

/// The session state machine. Owns the registry, the admin election and the
/// document store; turns each inbound event into mutations plus a list of
/// delivery directives for the transport layer to execute.
///
/// The coordinator is transport-free and strictly sequential: the caller
/// (one server task) feeds it one event at a time, which is what makes every
/// handler atomic and arrival order the global order for last-writer-wins.
pub struct SessionCoordinator {
    connection_id_source: Wrapping<ConnectionId>,
    registry: ParticipantRegistry,
    election: AdminElection,
    store: DocumentStore,
}

impl SessionCoordinator {
    pub fn new() -> Self {
        Self {
            connection_id_source: Wrapping(0),
            registry: ParticipantRegistry::new(),
            election: AdminElection::new(),
            store: DocumentStore::new(),
        }
    }

    /// Allocates the id for a newly accepted connection. The participant is
    /// not in the registry yet; it only materializes on `setName`.
    pub fn connect(&mut self) -> ConnectionId {
        self.connection_id_source += Wrapping(1);
        self.connection_id_source.0
    }

    pub fn handle(&mut self, from: ConnectionId, event: ClientEvent) -> Vec<Outbound> {
        match event {
            ClientEvent::SetName(name) => self.set_name(from, &name),
            ClientEvent::RequestFlow => self.request_flow(from),
            ClientEvent::FlowUpdate(document) => self.flow_update(from, document),
            ClientEvent::CursorMove(delta) => self.cursor_move(from, &delta),
        }
    }

    fn set_name(&mut self, from: ConnectionId, name: &str) -> Vec<Outbound> {
        let mut out = Vec::new();
        if self.election.elect_if_unset(from) {
            log::info!("connection {} elected admin", from);
            out.push(Outbound::new(
                Recipients::One(from),
                SessionEvent::SetAdmin(true),
            ));
        }
        self.registry.join(from, name);
        log::info!("connection {} joined as {:?}", from, name);
        out.push(Outbound::new(
            Recipients::All,
            SessionEvent::UpdateCursors(self.registry.snapshot()),
        ));
        // The document is not pushed here; joiners catch up via RequestFlow.
        out
    }

    fn request_flow(&self, from: ConnectionId) -> Vec<Outbound> {
        match self.store.request_snapshot() {
            Some(document) => vec![Outbound::new(
                Recipients::One(from),
                SessionEvent::UpdateFlow(document.clone()),
            )],
            None => Vec::new(),
        }
    }

    fn flow_update(&mut self, from: ConnectionId, document: Document) -> Vec<Outbound> {
        self.store.replace(document.clone());
        vec![Outbound::new(
            Recipients::AllExcept(from),
            SessionEvent::UpdateFlow(document),
        )]
    }

    fn cursor_move(&mut self, from: ConnectionId, delta: &CursorDelta) -> Vec<Outbound> {
        if !self.registry.update_cursor(from, delta) {
            return Vec::new();
        }
        let mut entry = crate::message::Presence::new();
        if let Some(cursor) = self.registry.get(from) {
            entry.insert(from, cursor.clone());
        }
        vec![Outbound::new(
            Recipients::AllExcept(from),
            SessionEvent::UpdateCursors(entry),
        )]
    }

    /// Terminal transition for a connection. The id is never handed out
    /// again, so late events for it fall into the silent no-op path.
    pub fn disconnect(&mut self, from: ConnectionId) -> Vec<Outbound> {
        self.registry.leave(from);
        let heir = self
            .election
            .on_departure(from, self.registry.connection_ids());

        let mut out = Vec::new();
        if let Some(heir) = heir {
            log::info!("connection {} left, {} elected admin", from, heir);
            out.push(Outbound::new(
                Recipients::One(heir),
                SessionEvent::SetAdmin(true),
            ));
        }
        out.push(Outbound::new(
            Recipients::All,
            SessionEvent::UpdateCursors(self.registry.snapshot()),
        ));
        out
    }

    pub fn admin(&self) -> Option<ConnectionId> {
        self.election.current()
    }

    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub fn document(&self) -> Document {
        self.store.get()
    }
}

impl Default for SessionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
