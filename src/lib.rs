//! kvnotes - Notes kept in a key-value store
//!
//! Notes live one per key in Redis (or a local file store) with a set of live
//! ids as the index used for listing. Searching, star filtering, and ordering
//! happen client-side over a snapshot of all notes.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

pub use error::NotesError;
