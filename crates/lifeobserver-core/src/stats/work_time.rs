//! Per-day aggregation of recorded work time.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::attendance::WorkTimeRecord;

/// Total recorded work for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyWorkTotal {
    pub date: String,
    pub total_ms: i64,
}

/// Sum of work-cycle durations recorded on `day`.
pub fn total_for_day(records: &[WorkTimeRecord], day: &str) -> i64 {
    records
        .iter()
        .filter(|r| r.date == day)
        .map(|r| r.duration.max(0))
        .sum()
}

/// Totals for the trailing `days_back` days ending at `end_day`
/// inclusive, oldest first. Days with no records report zero, so the
/// series is dense for charting.
pub fn daily_totals(
    records: &[WorkTimeRecord],
    end_day: NaiveDate,
    days_back: u32,
) -> Vec<DailyWorkTotal> {
    (0..days_back)
        .rev()
        .map(|offset| {
            let day = (end_day - Duration::days(i64::from(offset)))
                .format("%Y-%m-%d")
                .to_string();
            let total_ms = total_for_day(records, &day);
            DailyWorkTotal {
                date: day,
                total_ms,
            }
        })
        .collect()
}
