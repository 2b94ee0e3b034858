//! Habit completion rates over the current week or month.

use chrono::{DateTime, Datelike, Duration, Local};
use serde::Serialize;

use crate::habit::Habit;

const DAY_MS: i64 = 86_400_000;

/// Reporting window for completion rates. Weeks start on Monday; months
/// on the 1st. Both windows end "now", so the day count grows through
/// the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitCompletionRate {
    pub habit_id: i64,
    pub name: String,
    /// 0..=100, rounded to the nearest integer.
    pub rate_percent: u32,
}

/// Completion rate for every habit, in input order.
pub fn completion_rates(
    habits: &[Habit],
    period: ReportPeriod,
    now: DateTime<Local>,
) -> Vec<HabitCompletionRate> {
    habits
        .iter()
        .map(|habit| HabitCompletionRate {
            habit_id: habit.id,
            name: habit.name.clone(),
            rate_percent: completion_rate(habit, period, now),
        })
        .collect()
}

/// Rate for one habit.
///
/// A habit created mid-period is only on the hook for the days it has
/// existed: the denominator is the smaller of days-elapsed-in-period and
/// days-since-creation-or-period-start, never less than 1.
pub fn completion_rate(habit: &Habit, period: ReportPeriod, now: DateTime<Local>) -> u32 {
    let today = now.date_naive();
    let (start_day, total_days_in_period) = match period {
        ReportPeriod::Weekly => {
            let offset = today.weekday().num_days_from_monday();
            (today - Duration::days(i64::from(offset)), offset + 1)
        }
        ReportPeriod::Monthly => (today.with_day(1).unwrap_or(today), today.day()),
    };

    let period_start_ms = start_day
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis());

    let effective_start_ms = period_start_ms.max(habit.id);
    let elapsed_days = ((now.timestamp_millis() - effective_start_ms) as f64 / DAY_MS as f64)
        .ceil()
        .max(1.0) as i64;

    let check_ins_in_period = habit
        .check_ins
        .iter()
        .filter(|ts| **ts >= period_start_ms)
        .count();

    let denominator = i64::from(total_days_in_period).min(elapsed_days).max(1);
    ((check_ins_in_period as f64 / denominator as f64) * 100.0).round() as u32
}
