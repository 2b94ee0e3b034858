//! Punch-clock commands.

use clap::Subcommand;
use lifeobserver_core::clock;
use lifeobserver_core::storage::{AppState, Config, PunchLog, WorkTimeLog};
use lifeobserver_core::{AttendanceStatus, AttendanceTracker, Database, PunchKind, Reminder};

use super::common::{format_duration, today, CliResult};

#[derive(Subcommand)]
pub enum PunchAction {
    /// Clock in
    In,
    /// Clock out
    Out,
    /// Start a break
    Break,
    /// End the break
    Resume,
    /// Current attendance status
    Status,
    /// Punch records for a day
    Records {
        /// Day to list (default: today)
        #[arg(long)]
        day: Option<String>,
    },
    /// Stay open and surface reminders (ticks every 60s)
    Watch,
}

fn load_tracker(db: &Database, config: &Config) -> Result<AttendanceTracker, Box<dyn std::error::Error>> {
    let tracker = match AppState::new(db).attendance_status()? {
        Some(persisted) => AttendanceTracker::restore(
            persisted,
            config.attendance.work_hours,
            config.attendance.break_minutes,
            clock::now_ms(),
        ),
        None => AttendanceTracker::new(config.attendance.work_hours, config.attendance.break_minutes),
    };
    Ok(tracker)
}

fn apply_punch(db: &Database, tracker: &mut AttendanceTracker, kind: PunchKind) -> CliResult {
    let now = clock::now_ms();
    let outcome = tracker.punch(kind, now);

    // The audit log records every punch, applied or not.
    PunchLog::new(db).append(&outcome.record)?;

    if let Some(record) = &outcome.work_completed {
        WorkTimeLog::new(db).append(record)?;
        println!("Worked {} today.", format_duration(record.duration));
    }
    AppState::new(db).set_attendance_status(&tracker.persisted())?;

    if outcome.applied {
        println!("{} at {}.", kind.label(), outcome.record.date_time);
    } else {
        println!(
            "{} logged, but the clock is {:?} -- state unchanged.",
            kind.label(),
            tracker.status()
        );
    }
    Ok(())
}

fn print_status(tracker: &AttendanceTracker) {
    let now = clock::now_ms();
    match tracker.status() {
        AttendanceStatus::Idle => println!("Off the clock."),
        AttendanceStatus::Working => println!(
            "Working -- {} so far.",
            format_duration(tracker.elapsed_work_ms(now))
        ),
        AttendanceStatus::Break => println!(
            "On break -- {} so far.",
            format_duration(tracker.elapsed_break_ms(now))
        ),
    }
}

fn print_reminders(reminders: &[Reminder]) {
    for reminder in reminders {
        match reminder {
            Reminder::WorkEnd { work_hours } => {
                println!("⏰ You've been working {work_hours} hours -- time to clock out!");
            }
            Reminder::BreakEnd { break_minutes } => {
                println!("⏰ Break's over ({break_minutes} minutes) -- back to it!");
            }
        }
    }
}

pub async fn run(action: PunchAction) -> CliResult {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut tracker = load_tracker(&db, &config)?;

    match action {
        PunchAction::In => apply_punch(&db, &mut tracker, PunchKind::WorkIn)?,
        PunchAction::Out => apply_punch(&db, &mut tracker, PunchKind::WorkOut)?,
        PunchAction::Break => apply_punch(&db, &mut tracker, PunchKind::BreakStart)?,
        PunchAction::Resume => apply_punch(&db, &mut tracker, PunchKind::BreakEnd)?,
        PunchAction::Status => print_status(&tracker),
        PunchAction::Records { day } => {
            let day = day.unwrap_or_else(today);
            let records: Vec<_> = PunchLog::new(&db)
                .all()?
                .into_iter()
                .filter(|r| clock::local_day_of_ms(r.timestamp) == day)
                .collect();
            if records.is_empty() {
                println!("No punches on {day}.");
            }
            for record in records {
                println!("{}  {}", record.date_time, record.kind.label());
            }
        }
        PunchAction::Watch => {
            println!("Watching the clock; Ctrl-C to stop.");
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                print_reminders(&tracker.due_reminders(clock::now_ms()));
                print_status(&tracker);
            }
        }
    }
    Ok(())
}
