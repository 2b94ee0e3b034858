//! Integration tests for the punch clock: full day cycle, audit-trail
//! asymmetry, and restart restoration against the real store.

use chrono::{Local, TimeZone};
use lifeobserver_core::storage::{AppState, PunchLog, WorkTimeLog};
use lifeobserver_core::{AttendanceStatus, AttendanceTracker, Database, PunchKind};

fn at(h: u32, min: u32) -> i64 {
    Local
        .with_ymd_and_hms(2026, 8, 6, h, min, 0)
        .unwrap()
        .timestamp_millis()
}

/// Apply a punch the way the shell does: log unconditionally, persist
/// state and any completed work record.
fn punch(db: &Database, tracker: &mut AttendanceTracker, kind: PunchKind, now_ms: i64) -> bool {
    let outcome = tracker.punch(kind, now_ms);
    PunchLog::new(db).append(&outcome.record).unwrap();
    if let Some(record) = &outcome.work_completed {
        WorkTimeLog::new(db).append(record).unwrap();
    }
    AppState::new(db)
        .set_attendance_status(&tracker.persisted())
        .unwrap();
    outcome.applied
}

#[test]
fn nine_to_five_thirty_records_one_cycle() {
    let db = Database::open_memory().unwrap();
    let mut tracker = AttendanceTracker::new(8, 30);

    assert!(punch(&db, &mut tracker, PunchKind::WorkIn, at(9, 0)));
    assert!(punch(&db, &mut tracker, PunchKind::WorkOut, at(17, 30)));
    assert_eq!(tracker.status(), AttendanceStatus::Idle);

    let work = WorkTimeLog::new(&db).all().unwrap();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].duration, (8.5 * 3_600_000.0) as i64);
    assert_eq!(work[0].date, "2026-08-06");

    let punches = PunchLog::new(&db).all().unwrap();
    assert_eq!(punches.len(), 2);
    assert_eq!(punches[0].kind, PunchKind::WorkIn);
    assert_eq!(punches[0].timestamp, at(9, 0));
    assert_eq!(punches[1].kind, PunchKind::WorkOut);
    assert_eq!(punches[1].timestamp, at(17, 30));
}

#[test]
fn rejected_transitions_still_append_to_the_log() {
    let db = Database::open_memory().unwrap();
    let mut tracker = AttendanceTracker::new(8, 30);

    // Punching out and ending a break while idle: both no-ops, both logged.
    assert!(!punch(&db, &mut tracker, PunchKind::WorkOut, at(8, 0)));
    assert!(!punch(&db, &mut tracker, PunchKind::BreakEnd, at(8, 1)));
    assert_eq!(tracker.status(), AttendanceStatus::Idle);

    assert_eq!(PunchLog::new(&db).all().unwrap().len(), 2);
    assert!(WorkTimeLog::new(&db).all().unwrap().is_empty());
}

#[test]
fn restart_mid_day_restores_status_and_reminder() {
    let db = Database::open_memory().unwrap();
    let mut tracker = AttendanceTracker::new(8, 30);
    punch(&db, &mut tracker, PunchKind::WorkIn, at(9, 0));
    drop(tracker);

    // New process an hour later.
    let persisted = AppState::new(&db).attendance_status().unwrap().unwrap();
    let mut restored = AttendanceTracker::restore(persisted, 8, 30, at(10, 0));
    assert_eq!(restored.status(), AttendanceStatus::Working);
    assert_eq!(restored.elapsed_work_ms(at(10, 0)), 3_600_000);

    // The work-end reminder comes due at 17:00, not an hour late.
    assert!(restored.due_reminders(at(16, 59)).is_empty());
    assert_eq!(restored.due_reminders(at(17, 0)).len(), 1);
}

#[test]
fn restart_after_deadline_drops_missed_reminder() {
    let db = Database::open_memory().unwrap();
    let mut tracker = AttendanceTracker::new(8, 30);
    punch(&db, &mut tracker, PunchKind::WorkIn, at(9, 0));
    drop(tracker);

    let persisted = AppState::new(&db).attendance_status().unwrap().unwrap();
    let mut restored = AttendanceTracker::restore(persisted, 8, 30, at(18, 0));
    assert_eq!(restored.status(), AttendanceStatus::Working);
    assert!(restored.due_reminders(at(23, 0)).is_empty());
}

#[test]
fn break_in_the_middle_still_counts_wall_clock_work() {
    let db = Database::open_memory().unwrap();
    let mut tracker = AttendanceTracker::new(8, 30);

    punch(&db, &mut tracker, PunchKind::WorkIn, at(9, 0));
    punch(&db, &mut tracker, PunchKind::BreakStart, at(12, 0));
    assert_eq!(tracker.status(), AttendanceStatus::Break);
    punch(&db, &mut tracker, PunchKind::BreakEnd, at(12, 30));
    assert_eq!(tracker.status(), AttendanceStatus::Working);
    punch(&db, &mut tracker, PunchKind::WorkOut, at(17, 0));

    // Duration is wall clock from work-in to work-out.
    let work = WorkTimeLog::new(&db).all().unwrap();
    assert_eq!(work[0].duration, 8 * 3_600_000);
    assert_eq!(PunchLog::new(&db).all().unwrap().len(), 4);
}
