//! Domain layer - Note model, store record layout, and queries

pub mod note;
pub mod query;
pub mod record;

pub use note::{Note, NoteDraft, NoteId};
pub use query::{query, NoteQuery, NoteStats, SortKey};
