//! Mood index: mean per-tag value across a set of journal entries.

use serde::Serialize;

use crate::mood::{mood_value, MoodEntry};

/// Mean mood value with the number of tag occurrences it averages.
///
/// Absence of an index is "no data", not zero: an entry with no tags
/// contributes nothing, and a day with no tagged entries has no index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodIndex {
    pub average: f64,
    pub tag_count: usize,
}

/// Mean mood value over every tag occurrence in `entries`.
///
/// Returns `None` when there are zero tag occurrences -- never NaN.
pub fn mood_index<'a, I>(entries: I) -> Option<MoodIndex>
where
    I: IntoIterator<Item = &'a MoodEntry>,
{
    let mut total = 0_i64;
    let mut tag_count = 0_usize;
    for entry in entries {
        for tag in &entry.moods {
            total += i64::from(mood_value(tag));
            tag_count += 1;
        }
    }
    if tag_count == 0 {
        return None;
    }
    Some(MoodIndex {
        average: total as f64 / tag_count as f64,
        tag_count,
    })
}

/// Mood index restricted to one calendar day.
pub fn mood_index_for_day(entries: &[MoodEntry], day: &str) -> Option<MoodIndex> {
    mood_index(entries.iter().filter(|e| e.date == day))
}
