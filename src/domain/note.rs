//! Note entity and identifiers

use crate::error::{NotesError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque note identifier, minted once at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Mint a fresh random identifier
    pub fn generate() -> Self {
        NoteId(Uuid::new_v4())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for NoteId {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(NoteId)
            .map_err(|_| NotesError::InvalidNoteId(s.to_string()))
    }
}

/// A single stored text record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub starred: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Title to show in listings, falling back for untitled notes
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(untitled)"
        } else {
            &self.title
        }
    }
}

/// User input for a new or edited note, trimmed and checked for blankness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub starred: bool,
}

impl NoteDraft {
    /// Build a draft from raw input.
    ///
    /// Title and content are trimmed; a draft where both end up empty is
    /// rejected with [`NotesError::Validation`].
    pub fn new(title: &str, content: &str, starred: bool) -> Result<Self> {
        let title = title.trim();
        let content = content.trim();

        if title.is_empty() && content.is_empty() {
            return Err(NotesError::Validation(
                "Title and content are both empty".to_string(),
            ));
        }

        Ok(NoteDraft {
            title: title.to_string(),
            content: content.to_string(),
            starred,
        })
    }
}
