//! Export a note to a JSON file

use crate::domain::{Note, NoteId};
use crate::error::{NotesError, Result};
use crate::infrastructure::{KeyValueStore, NoteRepository};
use std::fs;
use std::path::{Path, PathBuf};

/// File name used when no output path is given
pub fn default_export_filename(id: &NoteId) -> String {
    format!("note-{}.json", id)
}

pub fn render_json(note: &Note) -> Result<String> {
    Ok(serde_json::to_string_pretty(note)?)
}

/// Write the note as pretty JSON to `output`, or to `note-<id>.json` inside
/// `default_dir`. Returns the path written.
pub fn export_note<S: KeyValueStore>(
    repository: &NoteRepository<S>,
    id: &NoteId,
    output: Option<&Path>,
    default_dir: &Path,
) -> Result<PathBuf> {
    let note = repository
        .get(id)?
        .ok_or_else(|| NotesError::NotFound(id.to_string()))?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => default_dir.join(default_export_filename(id)),
    };

    fs::write(&path, render_json(&note)?)?;
    Ok(path)
}
