//! Habit tracking: daily check-ins and growth milestones.

pub mod milestone;

pub use milestone::{milestone_for, Milestone};

use serde::{Deserialize, Serialize};

use crate::clock;

/// A tracked habit.
///
/// `id` is the creation instant in epoch milliseconds and doubles as the
/// creation-date marker for completion-rate ranges. `check_ins` is
/// append-only except on deletion or undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub check_ins: Vec<i64>,
}

/// Result of a check-in attempt. At most one check-in is accepted per
/// local calendar day; the second attempt leaves the habit unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckIn {
    Recorded,
    AlreadyCheckedInToday,
}

impl Habit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: clock::now_ms(),
            name: name.into(),
            check_ins: Vec::new(),
        }
    }

    /// Local calendar day the habit was created on.
    pub fn created_day(&self) -> String {
        clock::local_day_of_ms(self.id)
    }

    pub fn check_in_count(&self) -> u32 {
        self.check_ins.len() as u32
    }

    /// Whether a check-in exists on the given local calendar day.
    pub fn checked_in_on(&self, day: &str) -> bool {
        self.check_ins
            .iter()
            .any(|ts| clock::local_day_of_ms(*ts) == day)
    }

    /// Record a check-in at `now_ms`, or signal that today already has one.
    pub fn check_in(&mut self, now_ms: i64) -> CheckIn {
        let today = clock::local_day_of_ms(now_ms);
        if self.checked_in_on(&today) {
            return CheckIn::AlreadyCheckedInToday;
        }
        self.check_ins.push(now_ms);
        CheckIn::Recorded
    }

    /// Undo today's check-in, if any. Returns whether one was removed.
    pub fn undo_check_in(&mut self, today: &str) -> bool {
        let before = self.check_ins.len();
        self.check_ins
            .retain(|ts| clock::local_day_of_ms(*ts) != today);
        self.check_ins.len() != before
    }

    /// Current milestone derived from the cumulative check-in count.
    pub fn milestone(&self) -> Milestone {
        milestone_for(self.check_in_count())
    }
}
