//! Punch-clock state machine with reminder scheduling.
//!
//! The tracker operates on wall-clock deltas -- no internal threads. The
//! caller drives it with punches and a periodic `due_reminders()` poll
//! (the CLI ticks every 60 seconds).
//!
//! ## State transitions
//!
//! ```text
//! Idle --work-in--> Working --work-out--> Idle
//!                   Working --break-start--> Break --break-end--> Working
//! ```
//!
//! Every punch is appended to the audit log unconditionally; only the
//! transitions above change state. A work-out while idle is logged but
//! changes nothing.

use serde::{Deserialize, Serialize};

use crate::clock;

/// Punch action kinds, as stored in the append-only log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PunchKind {
    #[serde(rename = "work-in")]
    WorkIn,
    #[serde(rename = "work-out")]
    WorkOut,
    #[serde(rename = "break-start")]
    BreakStart,
    #[serde(rename = "break-end")]
    BreakEnd,
}

impl PunchKind {
    pub fn label(self) -> &'static str {
        match self {
            PunchKind::WorkIn => "clock in",
            PunchKind::WorkOut => "clock out",
            PunchKind::BreakStart => "start break",
            PunchKind::BreakEnd => "end break",
        }
    }
}

/// One append-only audit log entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchRecord {
    #[serde(rename = "type")]
    pub kind: PunchKind,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Human-readable instant for the records panel.
    pub date_time: String,
}

/// One completed work-in -> work-out cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTimeRecord {
    /// Local calendar day the cycle ended on.
    pub date: String,
    /// Worked duration in milliseconds.
    pub duration: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Idle,
    Working,
    Break,
}

/// The slice of tracker state persisted to the app-state store, so a
/// restart can pick up an in-progress work day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAttendance {
    pub status: AttendanceStatus,
    pub work_start_time: Option<i64>,
    pub break_start_time: Option<i64>,
}

/// A reminder that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reminder {
    /// The configured work-hours budget has elapsed since work-in.
    WorkEnd { work_hours: u32 },
    /// The configured break length has elapsed since break-start.
    BreakEnd { break_minutes: u32 },
}

/// Result of a punch: the audit record (always produced), whether the
/// state machine accepted the transition, and the work-time record when a
/// work cycle just completed.
#[derive(Debug, Clone, PartialEq)]
pub struct PunchOutcome {
    pub record: PunchRecord,
    pub applied: bool,
    pub work_completed: Option<WorkTimeRecord>,
}

/// Punch-clock tracker.
pub struct AttendanceTracker {
    status: AttendanceStatus,
    work_start_ms: Option<i64>,
    break_start_ms: Option<i64>,
    /// Pending reminder deadlines (epoch ms); cleared on any transition
    /// that supersedes them so stale reminders never fire.
    work_end_deadline_ms: Option<i64>,
    break_end_deadline_ms: Option<i64>,
    work_hours: u32,
    break_minutes: u32,
}

impl AttendanceTracker {
    pub fn new(work_hours: u32, break_minutes: u32) -> Self {
        Self {
            status: AttendanceStatus::Idle,
            work_start_ms: None,
            break_start_ms: None,
            work_end_deadline_ms: None,
            break_end_deadline_ms: None,
            work_hours,
            break_minutes,
        }
    }

    /// Rebuild a tracker from persisted state after a restart.
    ///
    /// Reminder deadlines are recomputed from the persisted start
    /// instants and the current configured durations; a deadline already
    /// in the past is dropped rather than replayed.
    pub fn restore(persisted: PersistedAttendance, work_hours: u32, break_minutes: u32, now_ms: i64) -> Self {
        let mut tracker = Self::new(work_hours, break_minutes);
        tracker.status = persisted.status;
        tracker.work_start_ms = persisted.work_start_time;
        tracker.break_start_ms = persisted.break_start_time;

        if tracker.status == AttendanceStatus::Working {
            if let Some(start) = tracker.work_start_ms {
                let deadline = start + work_hours_ms(work_hours);
                if deadline > now_ms {
                    tracker.work_end_deadline_ms = Some(deadline);
                }
            }
        }
        if tracker.status == AttendanceStatus::Break {
            if let Some(start) = tracker.break_start_ms {
                let deadline = start + break_minutes_ms(break_minutes);
                if deadline > now_ms {
                    tracker.break_end_deadline_ms = Some(deadline);
                }
            }
        }
        tracker
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> AttendanceStatus {
        self.status
    }

    /// Milliseconds worked so far in the current cycle.
    pub fn elapsed_work_ms(&self, now_ms: i64) -> i64 {
        match (self.status, self.work_start_ms) {
            (AttendanceStatus::Working | AttendanceStatus::Break, Some(start)) => {
                (now_ms - start).max(0)
            }
            _ => 0,
        }
    }

    /// Milliseconds into the current break.
    pub fn elapsed_break_ms(&self, now_ms: i64) -> i64 {
        match (self.status, self.break_start_ms) {
            (AttendanceStatus::Break, Some(start)) => (now_ms - start).max(0),
            _ => 0,
        }
    }

    pub fn persisted(&self) -> PersistedAttendance {
        PersistedAttendance {
            status: self.status,
            work_start_time: self.work_start_ms,
            break_start_time: self.break_start_ms,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply a punch at `now_ms`.
    ///
    /// The returned record must be appended to the punch log whether or
    /// not the transition applied -- the log is an unconditional audit
    /// trail, `status` is the guarded derived state.
    pub fn punch(&mut self, kind: PunchKind, now_ms: i64) -> PunchOutcome {
        let record = PunchRecord {
            kind,
            timestamp: now_ms,
            date_time: clock::display_datetime(now_ms),
        };
        let mut work_completed = None;

        let applied = match (self.status, kind) {
            (AttendanceStatus::Idle, PunchKind::WorkIn) => {
                self.status = AttendanceStatus::Working;
                self.work_start_ms = Some(now_ms);
                self.work_end_deadline_ms = Some(now_ms + work_hours_ms(self.work_hours));
                true
            }
            (AttendanceStatus::Working, PunchKind::WorkOut) => {
                if let Some(start) = self.work_start_ms {
                    work_completed = Some(WorkTimeRecord {
                        date: clock::local_day_of_ms(now_ms),
                        duration: (now_ms - start).max(0),
                    });
                }
                self.status = AttendanceStatus::Idle;
                self.work_start_ms = None;
                self.work_end_deadline_ms = None;
                self.break_end_deadline_ms = None;
                true
            }
            (AttendanceStatus::Working, PunchKind::BreakStart) => {
                self.status = AttendanceStatus::Break;
                self.break_start_ms = Some(now_ms);
                self.break_end_deadline_ms = Some(now_ms + break_minutes_ms(self.break_minutes));
                true
            }
            (AttendanceStatus::Break, PunchKind::BreakEnd) => {
                self.status = AttendanceStatus::Working;
                self.break_start_ms = None;
                self.break_end_deadline_ms = None;
                true
            }
            // Logged but not applied: the punch is still an audit fact.
            _ => false,
        };

        if !applied {
            tracing::debug!(kind = kind.label(), status = ?self.status, "punch ignored by state machine");
        }

        PunchOutcome {
            record,
            applied,
            work_completed,
        }
    }

    /// Return reminders whose deadline has passed, clearing each so it
    /// fires at most once. Safe to call on any cadence.
    pub fn due_reminders(&mut self, now_ms: i64) -> Vec<Reminder> {
        let mut due = Vec::new();
        if let Some(deadline) = self.work_end_deadline_ms {
            if now_ms >= deadline {
                self.work_end_deadline_ms = None;
                due.push(Reminder::WorkEnd {
                    work_hours: self.work_hours,
                });
            }
        }
        if let Some(deadline) = self.break_end_deadline_ms {
            if now_ms >= deadline {
                self.break_end_deadline_ms = None;
                due.push(Reminder::BreakEnd {
                    break_minutes: self.break_minutes,
                });
            }
        }
        due
    }
}

fn work_hours_ms(hours: u32) -> i64 {
    i64::from(hours) * 3_600_000
}

fn break_minutes_ms(minutes: u32) -> i64 {
    i64::from(minutes) * 60_000
}
