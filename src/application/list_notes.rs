//! List notes use case

use crate::domain::{Note, NoteQuery, NoteStats};
use crate::error::Result;
use crate::infrastructure::{KeyValueStore, NoteRepository};

/// Query result together with counts over the unfiltered set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub notes: Vec<Note>,
    pub stats: NoteStats,
}

impl Listing {
    /// Number of notes that passed the filters
    pub fn shown(&self) -> usize {
        self.notes.len()
    }
}

/// Read all notes once and apply the query to that snapshot.
pub fn list_notes<S: KeyValueStore>(
    repository: &NoteRepository<S>,
    query: &NoteQuery,
) -> Result<Listing> {
    let all = repository.list_all()?;
    let stats = NoteStats::from_notes(&all);

    Ok(Listing {
        notes: query.apply(all),
        stats,
    })
}
