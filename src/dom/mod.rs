mod document;
pub mod markup;

pub use self::document::{DomEvent, Document, EventKind, Listener, NodeId};
