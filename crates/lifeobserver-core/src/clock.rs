//! Local-calendar helpers.
//!
//! "Today" throughout the crate is a local-timezone `YYYY-MM-DD` string;
//! daily resets and per-day aggregation compare these strings for
//! equality, so a new day begins at local midnight.

use chrono::{DateTime, Local, TimeZone};

/// Current wall-clock time as epoch milliseconds.
pub fn now_ms() -> i64 {
    Local::now().timestamp_millis()
}

/// Local calendar-day string for an epoch-millisecond instant.
pub fn local_day_of_ms(ms: i64) -> String {
    local_datetime(ms).format("%Y-%m-%d").to_string()
}

/// Local calendar-day string for a `DateTime`.
pub fn day_string(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Display form used by punch records and entry headers.
pub fn display_datetime(ms: i64) -> String {
    local_datetime(ms).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Display clock time (`HH:MM`) for an instant.
pub fn display_time(ms: i64) -> String {
    local_datetime(ms).format("%H:%M").to_string()
}

fn local_datetime(ms: i64) -> DateTime<Local> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .unwrap_or_else(Local::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_string_is_iso_date() {
        let day = local_day_of_ms(now_ms());
        assert_eq!(day.len(), 10);
        assert_eq!(&day[4..5], "-");
        assert_eq!(&day[7..8], "-");
    }

    #[test]
    fn same_instant_same_day() {
        let ms = now_ms();
        assert_eq!(local_day_of_ms(ms), local_day_of_ms(ms));
    }
}
