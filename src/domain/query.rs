//! Filtering and ordering of note listings
//!
//! Everything here is pure: it takes the notes a repository returned and
//! decides which ones to show and in what order. No store access.
//!
//! # Examples
//!
//! ```
//! use kvnotes::domain::{NoteQuery, SortKey};
//!
//! let query = NoteQuery::new()
//!     .with_search("paris")
//!     .starred_only(true)
//!     .sorted_by(SortKey::CreatedAt);
//! assert!(query.starred_only);
//! ```

use crate::domain::Note;
use crate::error::NotesError;
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Timestamp a listing is ordered by (always newest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    UpdatedAt,
    CreatedAt,
}

impl SortKey {
    fn timestamp(self, note: &Note) -> DateTime<Utc> {
        match self {
            SortKey::UpdatedAt => note.updated_at,
            SortKey::CreatedAt => note.created_at,
        }
    }
}

impl FromStr for SortKey {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "updated" | "updated_at" => Ok(SortKey::UpdatedAt),
            "created" | "created_at" => Ok(SortKey::CreatedAt),
            _ => Err(NotesError::Config(format!(
                "Invalid sort key: '{}'. Valid keys are: updated, created",
                s
            ))),
        }
    }
}

/// Filter and order applied to a full note listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub search_text: String,
    pub starred_only: bool,
    pub sort_key: SortKey,
}

impl NoteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn starred_only(mut self, starred_only: bool) -> Self {
        self.starred_only = starred_only;
        self
    }

    pub fn sorted_by(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Check whether a note passes both filters
    pub fn matches(&self, note: &Note) -> bool {
        if self.starred_only && !note.starred {
            return false;
        }

        if self.search_text.is_empty() {
            return true;
        }

        let haystack = format!("{} {}", note.title, note.content).to_lowercase();
        haystack.contains(&self.search_text.to_lowercase())
    }

    /// Filter the notes and sort survivors newest first.
    /// The sort is stable, so equal timestamps keep their input order.
    pub fn apply(&self, notes: Vec<Note>) -> Vec<Note> {
        let mut result: Vec<Note> = notes.into_iter().filter(|n| self.matches(n)).collect();
        let key = self.sort_key;
        result.sort_by(|a, b| key.timestamp(b).cmp(&key.timestamp(a)));
        result
    }
}

/// Filter and order `notes` in one call
pub fn query(notes: Vec<Note>, search_text: &str, starred_only: bool, sort_key: SortKey) -> Vec<Note> {
    NoteQuery {
        search_text: search_text.to_string(),
        starred_only,
        sort_key,
    }
    .apply(notes)
}

/// Counts shown alongside a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteStats {
    pub total: usize,
    pub starred: usize,
}

impl NoteStats {
    pub fn from_notes(notes: &[Note]) -> Self {
        NoteStats {
            total: notes.len(),
            starred: notes.iter().filter(|n| n.starred).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteId;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 17, 12, 0, 0).unwrap()
    }

    fn note(title: &str, content: &str, starred: bool, created_min: i64, updated_min: i64) -> Note {
        Note {
            id: NoteId::generate(),
            title: title.to_string(),
            content: content.to_string(),
            starred,
            created_at: base_time() + Duration::minutes(created_min),
            updated_at: base_time() + Duration::minutes(updated_min),
        }
    }

    fn titles(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.title.as_str()).collect()
    }

    fn corpus() -> Vec<Note> {
        vec![
            note("Cats", "feeding schedule", false, 0, 10),
            note("Shopping", "cat food, litter", true, 1, 5),
            note("Trip", "Paris plan", true, 2, 20),
            note("Dogs", "walks", false, 3, 3),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_content() {
        let result = query(corpus(), "CAT", false, SortKey::UpdatedAt);
        assert_eq!(titles(&result), vec!["Cats", "Shopping"]);
    }

    #[test]
    fn test_search_spans_the_title_content_join() {
        let notes = vec![note("Paris", "plan", false, 0, 0)];
        assert_eq!(query(notes.clone(), "paris plan", false, SortKey::UpdatedAt).len(), 1);
        assert!(query(notes, "parisplan", false, SortKey::UpdatedAt).is_empty());
    }

    #[test]
    fn test_starred_only_sorted_by_updated() {
        let result = query(corpus(), "", true, SortKey::UpdatedAt);
        assert_eq!(titles(&result), vec!["Trip", "Shopping"]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let result = query(corpus(), "cat", true, SortKey::UpdatedAt);
        assert_eq!(titles(&result), vec!["Shopping"]);
    }

    #[test]
    fn test_sort_by_created_descending() {
        let result = query(corpus(), "", false, SortKey::CreatedAt);
        assert_eq!(titles(&result), vec!["Dogs", "Trip", "Shopping", "Cats"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let notes = vec![
            note("first", "", false, 0, 7),
            note("second", "", false, 0, 7),
            note("third", "", false, 0, 7),
        ];
        let result = query(notes, "", false, SortKey::UpdatedAt);
        assert_eq!(titles(&result), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(query(Vec::new(), "x", true, SortKey::UpdatedAt).is_empty());
    }

    #[test]
    fn test_query_is_deterministic() {
        let notes = corpus();
        let q = NoteQuery::new().with_search("a");
        assert_eq!(q.apply(notes.clone()), q.apply(notes));
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("updated".parse::<SortKey>().unwrap(), SortKey::UpdatedAt);
        assert_eq!("Created_At".parse::<SortKey>().unwrap(), SortKey::CreatedAt);
        assert!("title".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_stats() {
        let stats = NoteStats::from_notes(&corpus());
        assert_eq!(stats, NoteStats { total: 4, starred: 2 });
    }
}
