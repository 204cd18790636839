//! Note repository over a key-value store
//!
//! Notes are stored one per key (`note:<id>`) and enumerated through a set of
//! live ids (`notes:ids`). The record and its index entry are two separate
//! writes, so the two can disagree after a crash or a race:
//!
//! - an indexed id without a record is skipped by [`NoteRepository::list_all`]
//! - a record without an index entry is invisible and left alone
//!
//! There is no client-side locking. Concurrent updates to one note are
//! last-write-wins.

use crate::domain::record::{self, NOTE_INDEX_KEY};
use crate::domain::{Note, NoteId};
use crate::error::Result;
use crate::infrastructure::store::KeyValueStore;
use tracing::{debug, info, warn};

/// CRUD over notes plus the id index
#[derive(Debug, Clone)]
pub struct NoteRepository<S> {
    store: S,
}

impl<S: KeyValueStore> NoteRepository<S> {
    pub fn new(store: S) -> Self {
        NoteRepository { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create and persist a new note.
    ///
    /// Does not check for blank title and content; callers that take user
    /// input go through [`NoteDraft`](crate::domain::NoteDraft) first.
    pub fn create(&self, title: &str, content: &str, starred: bool) -> Result<Note> {
        let now = record::now();
        let note = Note {
            id: NoteId::generate(),
            title: title.to_string(),
            content: content.to_string(),
            starred,
            created_at: now,
            updated_at: now,
        };

        let id = note.id.to_string();
        // Record first: a crash in between leaves an invisible orphan,
        // never an index entry without a body.
        self.store
            .set(&record::note_key(&id), &record::encode(&note)?)?;
        self.store.add_to_set(NOTE_INDEX_KEY, &id)?;

        info!(id = %note.id, "created note");
        Ok(note)
    }

    /// Look up a note; `None` when it was deleted or never existed
    pub fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let key = record::note_key(&id.to_string());
        match self.store.get(&key)? {
            Some(raw) => Ok(Some(record::decode(id, &raw)?)),
            None => Ok(None),
        }
    }

    /// Replace a note's title, content and star flag.
    ///
    /// Returns `None` without writing anything when the note does not exist.
    pub fn update(
        &self,
        id: &NoteId,
        title: &str,
        content: &str,
        starred: bool,
    ) -> Result<Option<Note>> {
        let Some(mut note) = self.get(id)? else {
            debug!(id = %id, "update skipped, note missing");
            return Ok(None);
        };

        note.title = title.to_string();
        note.content = content.to_string();
        note.starred = starred;
        // Never move backwards, even if this host's clock is behind the writer's
        note.updated_at = record::now().max(note.updated_at);

        self.store
            .set(&record::note_key(&id.to_string()), &record::encode(&note)?)?;

        info!(id = %id, "updated note");
        Ok(Some(note))
    }

    /// Remove a note and its index entry. Missing notes are a no-op.
    pub fn delete(&self, id: &NoteId) -> Result<()> {
        self.delete_member(&id.to_string())?;
        info!(id = %id, "deleted note");
        Ok(())
    }

    fn delete_member(&self, member: &str) -> Result<()> {
        self.store.delete(&record::note_key(member))?;
        self.store.remove_from_set(NOTE_INDEX_KEY, member)
    }

    /// Read every indexed note, in no particular order.
    ///
    /// Index members whose record is gone are skipped, as are members that
    /// are not note ids at all.
    pub fn list_all(&self) -> Result<Vec<Note>> {
        let members = self.store.members_of(NOTE_INDEX_KEY)?;

        let mut ids = Vec::with_capacity(members.len());
        for member in &members {
            match member.parse::<NoteId>() {
                Ok(id) => ids.push(id),
                Err(_) => warn!(member = %member, "skipping invalid id in note index"),
            }
        }

        let keys: Vec<String> = ids
            .iter()
            .map(|id| record::note_key(&id.to_string()))
            .collect();
        let values = self.store.multi_get(&keys)?;

        let mut notes = Vec::with_capacity(ids.len());
        for (id, value) in ids.iter().zip(values) {
            match value {
                Some(raw) => notes.push(record::decode(id, &raw)?),
                None => debug!(id = %id, "skipping dangling index entry"),
            }
        }

        Ok(notes)
    }

    /// Delete every note indexed at the start of the call.
    ///
    /// Not a transaction: notes created while the sweep runs may survive.
    /// Returns how many index members were swept.
    pub fn delete_all(&self) -> Result<usize> {
        let snapshot = self.store.members_of(NOTE_INDEX_KEY)?;

        for member in &snapshot {
            self.delete_member(member)?;
        }

        info!(count = snapshot.len(), "deleted all notes");
        Ok(snapshot.len())
    }
}
