//! Mood journal entries and the fixed mood-value table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock;

/// The five canonical mood tags offered by the journal. Entries may carry
/// free-form tags as well; unknown tags score 0 in the mood index.
pub const DEFAULT_TAGS: [&str; 5] = ["happy", "grateful", "calm", "tired", "stressed"];

/// Fixed per-tag mood value.
///
/// This is the single canonical table used everywhere an index is
/// computed; see DESIGN.md for the resolved `tired` discrepancy.
pub fn mood_value(tag: &str) -> i32 {
    match tag {
        "happy" => 5,
        "grateful" => 4,
        "calm" => 3,
        "tired" => 1,
        "stressed" => -2,
        _ => 0,
    }
}

/// When in the day the entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodEntryKind {
    Morning,
    Evening,
    Note,
}

/// An image (or other file) attached to a journal entry, carried inline
/// as a data URI the way the journal stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteAttachment {
    pub name: String,
    pub mime: String,
    pub data: String,
}

impl NoteAttachment {
    /// Wrap raw file bytes as a data URI.
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: &[u8]) -> Self {
        use base64::Engine;
        let mime = mime.into();
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            name: name.into(),
            data: format!("data:{mime};base64,{encoded}"),
            mime,
        }
    }
}

/// One journal entry.
///
/// `date` is derivable from `timestamp` but stored redundantly so per-day
/// queries are a string compare; the constructor keeps them in agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    /// Epoch milliseconds at creation; doubles as the unique id.
    pub id: i64,
    /// Local calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Display clock time.
    pub time: String,
    #[serde(rename = "type")]
    pub kind: MoodEntryKind,
    /// Mood tags in insertion order, no duplicates.
    pub moods: Vec<String>,
    /// Markdown body.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<NoteAttachment>,
}

impl MoodEntry {
    /// Create an entry stamped "now"; `date`/`time` are derived from the
    /// same instant as `id` and `timestamp`.
    pub fn new(kind: MoodEntryKind, moods: Vec<String>, content: impl Into<String>) -> Self {
        let now = clock::now_ms();
        let mut deduped: Vec<String> = Vec::with_capacity(moods.len());
        for tag in moods {
            if !deduped.contains(&tag) {
                deduped.push(tag);
            }
        }
        Self {
            id: now,
            date: clock::local_day_of_ms(now),
            time: clock::display_time(now),
            kind,
            moods: deduped,
            content: content.into(),
            timestamp: Utc::now(),
            file: None,
        }
    }

    pub fn with_attachment(mut self, file: NoteAttachment) -> Self {
        self.file = Some(file);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_values_match_fixed_table() {
        assert_eq!(mood_value("happy"), 5);
        assert_eq!(mood_value("grateful"), 4);
        assert_eq!(mood_value("calm"), 3);
        assert_eq!(mood_value("tired"), 1);
        assert_eq!(mood_value("stressed"), -2);
        assert_eq!(mood_value("curious"), 0);
    }

    #[test]
    fn new_entry_derives_date_from_timestamp() {
        let entry = MoodEntry::new(MoodEntryKind::Morning, vec!["happy".into()], "sunny");
        assert_eq!(entry.date, clock::local_day_of_ms(entry.id));
    }

    #[test]
    fn duplicate_tags_collapse_preserving_order() {
        let entry = MoodEntry::new(
            MoodEntryKind::Note,
            vec!["calm".into(), "happy".into(), "calm".into()],
            "",
        );
        assert_eq!(entry.moods, vec!["calm".to_string(), "happy".to_string()]);
    }

    #[test]
    fn attachment_builds_a_data_uri() {
        let file = NoteAttachment::from_bytes("dot.png", "image/png", &[0, 1, 2]);
        assert!(file.data.starts_with("data:image/png;base64,"));
        assert_eq!(file.mime, "image/png");
    }

    #[test]
    fn serializes_with_original_field_names() {
        let entry = MoodEntry::new(MoodEntryKind::Evening, vec![], "night");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "evening");
        assert!(json.get("moods").is_some());
        assert!(json.get("file").is_none());
    }
}
