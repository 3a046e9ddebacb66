use crate::Document;

/// In-memory holder of the session's shared document. Last-writer-wins by
/// server-processing order: whichever `replace` runs last is the visible
/// state. No merging, no history, nothing durable.
#[derive(Debug, Default)]
pub struct DocumentStore {
    document: Option<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self { document: None }
    }

    /// Current document, or the empty document if never set.
    pub fn get(&self) -> Document {
        self.document.clone().unwrap_or_default()
    }

    /// Unconditional overwrite with the caller-supplied value.
    pub fn replace(&mut self, new_document: Document) {
        self.document = Some(new_document);
    }

    /// The document for an explicit catch-up request; `None` until a first
    /// write has happened, which the caller treats as "nothing to send".
    pub fn request_snapshot(&self) -> Option<&Document> {
        self.document.as_ref()
    }
}
