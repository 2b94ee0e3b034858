use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attendance::PunchKind;

/// Every user-visible state change produces an Event.
/// The trigger engine subscribes to the first three; the rest feed the
/// activity display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A task was created, completed, un-completed or deleted.
    TaskStateChanged {
        task_id: i64,
        completed: bool,
        at: DateTime<Utc>,
    },
    /// A habit received its daily check-in.
    HabitCheckedIn {
        habit_id: i64,
        habit_name: String,
        at: DateTime<Utc>,
    },
    /// A mood entry was written to the journal.
    MoodEntrySaved {
        entry_id: i64,
        at: DateTime<Utc>,
    },
    /// A punch was recorded (always logged, even when the transition
    /// was a no-op at the state level).
    Punched {
        kind: PunchKind,
        applied: bool,
        at: DateTime<Utc>,
    },
}
