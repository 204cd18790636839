//! Store record layout for notes
//!
//! Each note lives under `note:<id>` as a flat JSON object. The set of live ids
//! lives under [`NOTE_INDEX_KEY`]. Timestamps are written as fixed-width UTC
//! strings so that comparing them as text agrees with comparing them as times.

use crate::domain::{Note, NoteId};
use crate::error::{NotesError, Result};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

pub const NOTE_KEY_PREFIX: &str = "note:";
pub const NOTE_INDEX_KEY: &str = "notes:ids";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Formats accepted for timestamps that carry no offset. Read as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Store key for a note id (raw index member or formatted [`NoteId`])
pub fn note_key(id: &str) -> String {
    format!("{}{}", NOTE_KEY_PREFIX, id)
}

/// Current time at the precision records keep
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// On-store shape of a note
#[derive(Debug, Serialize, Deserialize)]
struct NoteRecord {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    starred: StarFlag,
    created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

/// Older writers stored the flag as a JSON bool, newer ones as "1"/"0"
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StarFlag {
    Bool(bool),
    Text(String),
}

impl Default for StarFlag {
    fn default() -> Self {
        StarFlag::Text("0".to_string())
    }
}

impl StarFlag {
    fn from_bool(starred: bool) -> Self {
        StarFlag::Text(if starred { "1" } else { "0" }.to_string())
    }

    fn to_bool(&self) -> Option<bool> {
        match self {
            StarFlag::Bool(b) => Some(*b),
            StarFlag::Text(s) => match s.trim() {
                "1" | "true" | "True" => Some(true),
                "0" | "false" | "False" | "" => Some(false),
                _ => None,
            },
        }
    }
}

/// Serialize a note into its store value
pub fn encode(note: &Note) -> Result<String> {
    let record = NoteRecord {
        id: note.id.to_string(),
        title: note.title.clone(),
        content: note.content.clone(),
        starred: StarFlag::from_bool(note.starred),
        created_at: format_timestamp(&note.created_at),
        updated_at: Some(format_timestamp(&note.updated_at)),
    };

    Ok(serde_json::to_string(&record)?)
}

/// Deserialize the store value found under `note:<expected>`
pub fn decode(expected: &NoteId, raw: &str) -> Result<Note> {
    let key = note_key(&expected.to_string());
    let corrupt = |reason: String| NotesError::CorruptRecord {
        key: key.clone(),
        reason,
    };

    let record: NoteRecord = serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;

    let id: NoteId = record
        .id
        .parse()
        .map_err(|_| corrupt(format!("invalid id '{}'", record.id)))?;
    if id != *expected {
        return Err(corrupt(format!("record carries id {}", id)));
    }

    let starred = record
        .starred
        .to_bool()
        .ok_or_else(|| corrupt(format!("invalid starred flag {:?}", record.starred)))?;

    let created_at = parse_timestamp(&record.created_at)
        .ok_or_else(|| corrupt(format!("invalid created_at '{}'", record.created_at)))?;

    let updated_at = match record.updated_at.as_deref() {
        Some(s) => {
            parse_timestamp(s).ok_or_else(|| corrupt(format!("invalid updated_at '{}'", s)))?
        }
        None => created_at,
    };

    Ok(Note {
        id,
        title: record.title,
        content: record.content,
        starred,
        created_at,
        updated_at: updated_at.max(created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_note() -> Note {
        let created = Utc.with_ymd_and_hms(2025, 1, 17, 9, 30, 0).unwrap();
        Note {
            id: NoteId::generate(),
            title: "Groceries".to_string(),
            content: "milk, eggs".to_string(),
            starred: true,
            created_at: created,
            updated_at: created + chrono::Duration::minutes(5),
        }
    }

    #[test]
    fn test_note_key() {
        assert_eq!(note_key("abc"), "note:abc");
    }

    #[test]
    fn test_encode_uses_string_flags_and_fixed_width_timestamps() {
        let note = sample_note();
        let raw = encode(&note).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["id"], note.id.to_string());
        assert_eq!(value["title"], "Groceries");
        assert_eq!(value["starred"], "1");
        assert_eq!(value["created_at"], "2025-01-17T09:30:00.000000Z");
        assert_eq!(value["updated_at"], "2025-01-17T09:35:00.000000Z");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut note = sample_note();
        note.created_at = now();
        note.updated_at = note.created_at;

        let raw = encode(&note).unwrap();
        let decoded = decode(&note.id, &raw).unwrap();
        assert_eq!(decoded, note);
    }

    #[test]
    fn test_timestamp_text_order_matches_time_order() {
        let early = Utc.with_ymd_and_hms(2025, 1, 9, 23, 59, 59).unwrap();
        let late = early + chrono::Duration::microseconds(1);
        assert!(format_timestamp(&early) < format_timestamp(&late));

        let next_day = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        assert!(format_timestamp(&late) < format_timestamp(&next_day));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 17, 9, 30, 0).unwrap();

        assert_eq!(parse_timestamp("2025-01-17T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-17T09:30:00.000000Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-17T10:30:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-17T09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-17 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_decode_bool_starred_and_missing_updated_at() {
        let id = NoteId::generate();
        let raw = format!(
            r#"{{"id":"{}","title":"Trip","content":"Paris plan","starred":true,"created_at":"2025-01-17 09:30:00"}}"#,
            id
        );

        let note = decode(&id, &raw).unwrap();
        assert!(note.starred);
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.title, "Trip");
    }

    #[test]
    fn test_decode_missing_text_fields_default_to_empty() {
        let id = NoteId::generate();
        let raw = format!(
            r#"{{"id":"{}","starred":"0","created_at":"2025-01-17T09:30:00Z"}}"#,
            id
        );

        let note = decode(&id, &raw).unwrap();
        assert_eq!(note.title, "");
        assert_eq!(note.content, "");
        assert!(!note.starred);
    }

    #[test]
    fn test_decode_clamps_updated_before_created() {
        let id = NoteId::generate();
        let raw = format!(
            r#"{{"id":"{}","title":"t","content":"","starred":"0","created_at":"2025-01-17T09:30:00Z","updated_at":"2025-01-17T09:00:00Z"}}"#,
            id
        );

        let note = decode(&id, &raw).unwrap();
        assert_eq!(note.updated_at, note.created_at);
    }

    #[test]
    fn test_decode_rejects_mismatched_id() {
        let id = NoteId::generate();
        let other = NoteId::generate();
        let raw = format!(
            r#"{{"id":"{}","title":"t","starred":"0","created_at":"2025-01-17T09:30:00Z"}}"#,
            other
        );

        match decode(&id, &raw) {
            Err(NotesError::CorruptRecord { key, reason }) => {
                assert_eq!(key, note_key(&id.to_string()));
                assert!(reason.contains(&other.to_string()));
            }
            other => panic!("Expected CorruptRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_bad_flag_and_bad_json() {
        let id = NoteId::generate();
        let bad_flag = format!(
            r#"{{"id":"{}","starred":"maybe","created_at":"2025-01-17T09:30:00Z"}}"#,
            id
        );
        assert!(matches!(
            decode(&id, &bad_flag),
            Err(NotesError::CorruptRecord { .. })
        ));
        assert!(matches!(
            decode(&id, "not json"),
            Err(NotesError::CorruptRecord { .. })
        ));
    }
}
