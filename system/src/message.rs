use crate::{ConnectionId, CursorDelta, CursorState, Document};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Full or single-entry presence table, keyed by connection id. Receivers
/// merge by key, so a one-entry map is a valid incremental update.
pub type Presence = HashMap<ConnectionId, CursorState>;

/// Inbound events, client → server. One JSON object per frame:
/// `{"event": "setName", "payload": "Alice"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ClientEvent {
    SetName(String),
    RequestFlow,
    FlowUpdate(Document),
    CursorMove(CursorDelta),
}

/// Outbound events, server → client, same envelope as [`ClientEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum SessionEvent {
    SetAdmin(bool),
    UpdateFlow(Document),
    UpdateCursors(Presence),
}

/// Delivery target for one outbound event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recipients {
    One(ConnectionId),
    AllExcept(ConnectionId),
    All,
}

/// A delivery directive decided by the coordinator and executed by the
/// transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Recipients,
    pub event: SessionEvent,
}

impl Outbound {
    pub fn new(to: Recipients, event: SessionEvent) -> Self {
        Self { to, event }
    }
}
