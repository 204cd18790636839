//! Application layer - Use cases and orchestration

pub mod export_note;
pub mod init;
pub mod list_notes;
pub mod manage_config;
pub mod manage_notes;

pub use export_note::export_note;
pub use list_notes::{list_notes, Listing};
pub use manage_config::ConfigService;
pub use manage_notes::{NoteEdit, NoteService};
