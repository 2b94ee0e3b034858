//! One-day roll-up across every module, for the review panel.

use serde::Serialize;

use super::mood_index::{mood_index_for_day, MoodIndex};
use super::task_score::scores_for_day;
use super::work_time::total_for_day;
use crate::attendance::WorkTimeRecord;
use crate::habit::Habit;
use crate::mood::MoodEntry;
use crate::task::Task;

/// Everything the daily review shows for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: String,
    /// Total punched work time.
    pub work_ms: i64,
    /// Names of habits checked in that day.
    pub completed_habits: Vec<String>,
    pub task_total: usize,
    pub task_completed: usize,
    pub task_score: u32,
    /// `None` when the day has no tagged entries.
    pub mood_index: Option<MoodIndex>,
}

/// Assemble the summary from entity snapshots. Pure; empty inputs give
/// an all-zero summary rather than an error.
pub fn daily_summary(
    date: &str,
    tasks: &[Task],
    habits: &[Habit],
    moods: &[MoodEntry],
    work_records: &[WorkTimeRecord],
) -> DailySummary {
    let day_tasks: Vec<&Task> = tasks.iter().filter(|t| t.date == date).collect();
    let scores = scores_for_day(tasks, date);

    DailySummary {
        date: date.to_string(),
        work_ms: total_for_day(work_records, date),
        completed_habits: habits
            .iter()
            .filter(|h| h.checked_in_on(date))
            .map(|h| h.name.clone())
            .collect(),
        task_total: day_tasks.len(),
        task_completed: day_tasks.iter().filter(|t| t.completed).count(),
        task_score: scores.earned,
        mood_index: mood_index_for_day(moods, date),
    }
}
