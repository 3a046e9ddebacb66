use std::collections::HashMap;

use flowdeck_system::{
    ClientEvent, ConnectionId, CursorDelta, Document, Node, Outbound, Position, Recipients,
    SessionCoordinator, SessionEvent,
};

/// Expands delivery directives against the set of live connections, the way
/// the server task fans them out, so tests can assert on what each client
/// actually receives.
struct Harness {
    session: SessionCoordinator,
    connected: Vec<ConnectionId>,
    inboxes: HashMap<ConnectionId, Vec<SessionEvent>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            session: SessionCoordinator::new(),
            connected: Vec::new(),
            inboxes: HashMap::new(),
        }
    }

    fn connect(&mut self) -> ConnectionId {
        let id = self.session.connect();
        self.connected.push(id);
        self.inboxes.insert(id, Vec::new());
        id
    }

    fn send(&mut self, from: ConnectionId, event: ClientEvent) {
        let out = self.session.handle(from, event);
        self.deliver(out);
    }

    fn disconnect(&mut self, from: ConnectionId) {
        self.connected.retain(|id| *id != from);
        let out = self.session.disconnect(from);
        self.deliver(out);
    }

    fn deliver(&mut self, out: Vec<Outbound>) {
        for Outbound { to, event } in out {
            match to {
                Recipients::One(id) => self.push(id, event),
                Recipients::AllExcept(without) => {
                    for id in self.connected.clone() {
                        if id != without {
                            self.push(id, event.clone());
                        }
                    }
                }
                Recipients::All => {
                    for id in self.connected.clone() {
                        self.push(id, event.clone());
                    }
                }
            }
        }
    }

    fn push(&mut self, id: ConnectionId, event: SessionEvent) {
        if let Some(inbox) = self.inboxes.get_mut(&id) {
            inbox.push(event);
        }
    }

    fn drain(&mut self, id: ConnectionId) -> Vec<SessionEvent> {
        std::mem::replace(self.inboxes.get_mut(&id).unwrap(), Vec::new())
    }
}

fn single_node_document(id: &str) -> Document {
    Document {
        nodes: vec![Node {
            id: id.into(),
            node_type: Some("input".into()),
            data: serde_json::json!({ "label": "Input Node" }),
            position: Position { x: 250.0, y: 25.0 },
        }],
        edges: vec![],
    }
}

fn admin_grants(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::SetAdmin(true)))
        .count()
}

#[test]
fn it_runs_a_three_participant_session() {
    let mut h = Harness::new();
    let a = h.connect();
    let b = h.connect();
    let c = h.connect();

    // Joins: only Alice is told she is admin; every join broadcasts the
    // growing presence table to everyone.
    h.send(a, ClientEvent::SetName("Alice".into()));
    h.send(b, ClientEvent::SetName("Bob".into()));
    h.send(c, ClientEvent::SetName("Carol".into()));
    assert_eq!(h.session.admin(), Some(a));

    let a_events = h.drain(a);
    assert_eq!(admin_grants(&a_events), 1);
    let presence_sizes: Vec<usize> = a_events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::UpdateCursors(p) => Some(p.len()),
            _ => None,
        })
        .collect();
    assert_eq!(presence_sizes, vec![1, 2, 3]);
    assert_eq!(admin_grants(&h.drain(b)), 0);
    assert_eq!(admin_grants(&h.drain(c)), 0);

    // Alice replaces the flow: exactly Bob and Carol see it.
    h.send(a, ClientEvent::FlowUpdate(single_node_document("1")));
    assert!(h.drain(a).is_empty());
    for id in [b, c].iter() {
        let events = h.drain(*id);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            SessionEvent::UpdateFlow(single_node_document("1"))
        );
    }

    // Bob moves his cursor: Alice and Carol get the single-entry delta with
    // Bob's name retained; Bob gets nothing.
    h.send(
        b,
        ClientEvent::CursorMove(CursorDelta {
            x: Some(1.0),
            y: Some(1.0),
            ..Default::default()
        }),
    );
    assert!(h.drain(b).is_empty());
    for id in [a, c].iter() {
        let events = h.drain(*id);
        assert_eq!(events.len(), 1);
        match &events[0] {
            SessionEvent::UpdateCursors(presence) => {
                assert_eq!(presence.len(), 1);
                let cursor = &presence[&b];
                assert_eq!(cursor.x, 1.0);
                assert_eq!(cursor.y, 1.0);
                assert_eq!(cursor.name.as_deref(), Some("Bob"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}

#[test]
fn it_reassigns_admin_on_departure() {
    let mut h = Harness::new();
    let a = h.connect();
    let b = h.connect();
    let c = h.connect();
    h.send(a, ClientEvent::SetName("Alice".into()));
    h.send(b, ClientEvent::SetName("Bob".into()));
    h.send(c, ClientEvent::SetName("Carol".into()));
    h.drain(a);
    h.drain(b);
    h.drain(c);

    h.disconnect(a);

    // Smallest remaining id wins, exactly one grant.
    assert_eq!(h.session.admin(), Some(b));
    let b_events = h.drain(b);
    assert_eq!(admin_grants(&b_events), 1);
    assert_eq!(admin_grants(&h.drain(c)), 0);

    // The departure presence broadcast no longer contains Alice.
    match b_events.last() {
        Some(SessionEvent::UpdateCursors(presence)) => {
            assert_eq!(presence.len(), 2);
            assert!(!presence.contains_key(&a));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn it_resolves_concurrent_flow_updates_last_writer_wins() {
    let mut h = Harness::new();
    let a = h.connect();
    let b = h.connect();
    h.send(a, ClientEvent::SetName("Alice".into()));
    h.send(b, ClientEvent::SetName("Bob".into()));

    h.send(a, ClientEvent::FlowUpdate(single_node_document("d1")));
    h.send(b, ClientEvent::FlowUpdate(single_node_document("d2")));
    assert_eq!(h.session.document(), single_node_document("d2"));

    // A late joiner catching up sees only the winning write.
    let c = h.connect();
    h.send(c, ClientEvent::SetName("Carol".into()));
    h.drain(c);
    h.send(c, ClientEvent::RequestFlow);
    assert_eq!(
        h.drain(c),
        vec![SessionEvent::UpdateFlow(single_node_document("d2"))]
    );
}
