//! Time-quadrant planner tasks.

use serde::{Deserialize, Serialize};

use crate::clock;

/// Eisenhower quadrant. The weight mapping A=4, B=3, C=2, D=1 is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    A,
    B,
    C,
    D,
}

impl Quadrant {
    pub fn weight(self) -> u32 {
        match self {
            Quadrant::A => 4,
            Quadrant::B => 3,
            Quadrant::C => 2,
            Quadrant::D => 1,
        }
    }

    /// Urgent/important reading of the quadrant, for display.
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::A => "urgent & important",
            Quadrant::B => "important, not urgent",
            Quadrant::C => "urgent, not important",
            Quadrant::D => "neither urgent nor important",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Some(Quadrant::A),
            "B" => Some(Quadrant::B),
            "C" => Some(Quadrant::C),
            "D" => Some(Quadrant::D),
            _ => None,
        }
    }
}

fn default_duration() -> u32 {
    30
}

/// A scheduled task on the quadrant planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Epoch milliseconds at creation; batch-recurring creation offsets
    /// the base instant per date so ids stay unique.
    pub id: i64,
    /// Local calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// 12-hour display time, e.g. `09:30 PM`.
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
    pub content: String,
    pub quadrant: Quadrant,
    pub completed: bool,
}

impl Task {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        content: impl Into<String>,
        quadrant: Quadrant,
        duration: u32,
    ) -> Self {
        Self {
            id: clock::now_ms(),
            date: date.into(),
            time: time.into(),
            duration,
            content: content.into(),
            quadrant,
            completed: false,
        }
    }

    /// Create one task per date, sharing time/content/quadrant. Ids are
    /// the creation instant plus the date's index.
    pub fn batch_recurring(
        dates: &[String],
        time: &str,
        content: &str,
        quadrant: Quadrant,
        duration: u32,
    ) -> Vec<Task> {
        let base = clock::now_ms();
        dates
            .iter()
            .enumerate()
            .map(|(index, date)| Task {
                id: base + index as i64,
                date: date.clone(),
                time: time.to_string(),
                duration,
                content: content.to_string(),
                quadrant,
                completed: false,
            })
            .collect()
    }

    /// 24-hour sort key for the display time, so `01:00 PM` orders after
    /// `11:00 AM`.
    pub fn sort_key(&self) -> String {
        to_24_hour(&self.time)
    }
}

/// Convert a `hh:mm AM/PM` display time to a 24-hour `HH:MM` sort key.
/// Times without an AM/PM marker pass through unchanged.
pub fn to_24_hour(time_12h: &str) -> String {
    let Some((time, modifier)) = time_12h.split_once(' ') else {
        return time_12h.to_string();
    };
    let Some((hours, minutes)) = time.split_once(':') else {
        return time_12h.to_string();
    };
    let Ok(mut h) = hours.parse::<u32>() else {
        return time_12h.to_string();
    };
    match modifier.to_ascii_uppercase().as_str() {
        "AM" => {
            if h == 12 {
                h = 0;
            }
        }
        "PM" => {
            if h != 12 {
                h += 12;
            }
        }
        _ => return time_12h.to_string(),
    }
    format!("{h:02}:{minutes}")
}
