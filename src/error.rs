//! Error types for kvnotes

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kvnotes
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("Not a kvnotes workspace: {0}")]
    NotInitialized(PathBuf),

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Invalid note: {0}")]
    Validation(String),

    #[error("Invalid note id: {0}")]
    InvalidNoteId(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Key holds the wrong kind of value: {0}")]
    WrongType(String),

    #[error("Corrupt record at '{key}': {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<redis::RedisError> for NotesError {
    fn from(err: redis::RedisError) -> Self {
        if err.code() == Some("WRONGTYPE") {
            return NotesError::WrongType(err.to_string());
        }
        NotesError::StoreUnavailable(err.to_string())
    }
}

impl NotesError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NotesError::NotInitialized(_) => 2,
            NotesError::Validation(_) => 3,
            NotesError::NotFound(_) | NotesError::InvalidNoteId(_) => 4,
            NotesError::StoreUnavailable(_) => 5,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            NotesError::NotInitialized(path) => {
                format!(
                    "Not a kvnotes workspace: {}\n\n\
                    Suggestions:\n\
                    • Run 'kvnotes init' in this directory to create a workspace\n\
                    • Navigate to an existing kvnotes workspace\n\
                    • Set KVNOTES_ROOT environment variable to your workspace path",
                    path.display()
                )
            }
            NotesError::NotFound(id) => {
                format!(
                    "Note not found: {} (it may have been deleted)\n\n\
                    Suggestions:\n\
                    • Use 'kvnotes list' to see the ids of live notes",
                    id
                )
            }
            NotesError::Validation(msg) => {
                format!(
                    "{}\n\n\
                    A note needs a title or some content.\n\
                    Example: kvnotes add --title 'Groceries' --content 'milk, eggs'",
                    msg
                )
            }
            NotesError::StoreUnavailable(msg) => {
                format!(
                    "Store unavailable: {}\n\n\
                    Suggestions:\n\
                    • Check that the Redis server is running and reachable\n\
                    • Check redis_url with 'kvnotes config redis_url'\n\
                    • Override the URL for one run with REDIS_URL=redis://host:port",
                    msg
                )
            }
            NotesError::Config(msg) => {
                if msg.contains("Invalid backend") {
                    format!(
                        "{}\n\n\
                        Valid backends: redis, file\n\
                        Example: kvnotes config backend file",
                        msg
                    )
                } else if msg.contains("Invalid sort key") {
                    format!(
                        "{}\n\n\
                        Valid sort keys: updated, created\n\
                        Example: kvnotes list --sort created",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using NotesError
pub type Result<T> = std::result::Result<T, NotesError>;
