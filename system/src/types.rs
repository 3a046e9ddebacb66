use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Server-assigned, opaque per-connection token. Primary key for presence and
/// admin state; never reused within a process lifetime.
pub type ConnectionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// The shared flow graph. A single mutable value per session, replaced
/// wholesale on every update. Node and edge ids are caller-supplied and their
/// uniqueness is not enforced here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// One participant's presence record: display name plus live pointer state.
/// Clients may attach fields beyond the known ones; `extra` keeps them so
/// deltas merge losslessly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub is_dragging: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Partial cursor update: only the fields present in the payload are applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dragging: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CursorState {
    /// Shallow merge, matching how clients spread deltas over the previous
    /// state. Fields absent from the delta keep their current value.
    pub fn apply(&mut self, delta: &CursorDelta) {
        if let Some(ref name) = delta.name {
            self.name = Some(name.clone());
        }
        if let Some(x) = delta.x {
            self.x = x;
        }
        if let Some(y) = delta.y {
            self.y = y;
        }
        if let Some(ref color) = delta.color {
            self.color = Some(color.clone());
        }
        if let Some(is_dragging) = delta.is_dragging {
            self.is_dragging = is_dragging;
        }
        for (key, value) in &delta.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}
