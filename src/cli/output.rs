//! Output formatting utilities

use crate::domain::{Note, NoteStats};

const LIST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn star_marker(note: &Note) -> &'static str {
    if note.starred {
        "★"
    } else {
        "☆"
    }
}

/// Format a list of notes for display
pub fn format_note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes found".to_string();
    }

    let mut output = String::new();
    for note in notes {
        output.push_str(&format!(
            "{} {}  {}  {}\n",
            star_marker(note),
            note.updated_at.format(LIST_TIME_FORMAT),
            note.id,
            note.display_title()
        ));
    }
    output
}

/// Format one note with all of its fields
pub fn format_note(note: &Note) -> String {
    let mut output = format!(
        "{} {}\n\
        id:      {}\n\
        created: {}\n\
        updated: {}\n",
        star_marker(note),
        note.display_title(),
        note.id,
        note.created_at.format(LIST_TIME_FORMAT),
        note.updated_at.format(LIST_TIME_FORMAT),
    );

    if !note.content.is_empty() {
        output.push('\n');
        output.push_str(&note.content);
        output.push('\n');
    }

    output
}

pub fn format_stats(stats: &NoteStats, shown: usize) -> String {
    format!(
        "Total notes: {}\nStarred notes: {}\nShown: {}\n",
        stats.total, stats.starred, shown
    )
}
