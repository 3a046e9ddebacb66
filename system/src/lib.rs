pub extern crate serde;
pub extern crate serde_json;

mod coordinator;
mod document_store;
mod election;
mod message;
mod registry;
mod types;

pub use coordinator::SessionCoordinator;
pub use document_store::DocumentStore;
pub use election::AdminElection;
pub use message::{ClientEvent, Outbound, Presence, Recipients, SessionEvent};
pub use registry::ParticipantRegistry;
pub use types::{ConnectionId, CursorDelta, CursorState, Document, Edge, Node, Position};
