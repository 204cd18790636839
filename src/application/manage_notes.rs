//! Create, edit, star, and delete notes from user input

use crate::domain::{Note, NoteDraft, NoteId};
use crate::error::{NotesError, Result};
use crate::infrastructure::{KeyValueStore, NoteRepository};

pub const SAMPLE_TITLE: &str = "Sample Note";
pub const SAMPLE_CONTENT: &str = "This is a sample note.";

/// Fields to change in an edit; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub starred: Option<bool>,
}

/// Service for note mutations driven by user input.
///
/// Unlike [`NoteRepository`], this rejects notes whose title and content are
/// both blank, on create and on edit.
pub struct NoteService<S> {
    repository: NoteRepository<S>,
}

impl<S: KeyValueStore> NoteService<S> {
    pub fn new(repository: NoteRepository<S>) -> Self {
        NoteService { repository }
    }

    pub fn repository(&self) -> &NoteRepository<S> {
        &self.repository
    }

    /// Create a note from raw input (trimmed, must not be blank)
    pub fn add(&self, title: &str, content: &str, starred: bool) -> Result<Note> {
        let draft = NoteDraft::new(title, content, starred)?;
        self.repository
            .create(&draft.title, &draft.content, draft.starred)
    }

    /// Create the canned sample note
    pub fn add_sample(&self) -> Result<Note> {
        self.repository.create(SAMPLE_TITLE, SAMPLE_CONTENT, false)
    }

    pub fn show(&self, id: &NoteId) -> Result<Note> {
        self.repository
            .get(id)?
            .ok_or_else(|| NotesError::NotFound(id.to_string()))
    }

    /// Apply an edit on top of the stored note
    pub fn edit(&self, id: &NoteId, edit: NoteEdit) -> Result<Note> {
        let current = self.show(id)?;

        let title = edit.title.unwrap_or(current.title);
        let content = edit.content.unwrap_or(current.content);
        let starred = edit.starred.unwrap_or(current.starred);
        let draft = NoteDraft::new(&title, &content, starred)?;

        // The note can vanish between the read and the write
        self.repository
            .update(id, &draft.title, &draft.content, draft.starred)?
            .ok_or_else(|| NotesError::NotFound(id.to_string()))
    }

    /// Flip the star flag, keeping title and content as stored
    pub fn toggle_star(&self, id: &NoteId) -> Result<Note> {
        let current = self.show(id)?;

        self.repository
            .update(id, &current.title, &current.content, !current.starred)?
            .ok_or_else(|| NotesError::NotFound(id.to_string()))
    }

    pub fn remove(&self, id: &NoteId) -> Result<()> {
        self.repository.delete(id)
    }

    /// Delete every note; returns how many were swept
    pub fn clear(&self) -> Result<usize> {
        self.repository.delete_all()
    }
}
