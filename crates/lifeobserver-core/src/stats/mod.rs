//! Derived statistics over the raw entity collections.
//!
//! Everything here is a pure function of its inputs: callers load the
//! collections and pick the range. Missing or malformed source data is
//! treated as empty -- a failed chart is an empty chart, never a crash.

pub mod daily_summary;
pub mod habit_rate;
pub mod mood_index;
pub mod task_score;
pub mod work_time;

pub use daily_summary::{daily_summary, DailySummary};
pub use habit_rate::{completion_rates, HabitCompletionRate, ReportPeriod};
pub use mood_index::{mood_index, mood_index_for_day, MoodIndex};
pub use task_score::{earned_score, monthly_title, possible_score, scores_for_day, DayScores};
pub use work_time::{daily_totals, total_for_day, DailyWorkTotal};
