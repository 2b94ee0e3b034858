//! Habit tracking commands.

use chrono::{Local, Utc};
use clap::Subcommand;
use lifeobserver_core::clock;
use lifeobserver_core::stats::{completion_rates, ReportPeriod};
use lifeobserver_core::storage::{repos::HabitCheckIn, HabitStore};
use lifeobserver_core::{Database, Event, Habit};

use super::common::{run_triggers, today, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Start tracking a new habit
    Add {
        /// Habit name
        name: String,
    },
    /// List habits with their milestones
    List,
    /// Check a habit in for today
    CheckIn {
        /// Habit id
        id: i64,
    },
    /// Undo today's check-in
    Undo {
        /// Habit id
        id: i64,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit id
        id: i64,
    },
    /// Completion-rate report
    Report {
        /// Period: weekly or monthly
        #[arg(long, default_value = "weekly")]
        period: String,
    },
}

pub async fn run(action: HabitAction) -> CliResult {
    let db = Database::open()?;
    let store = HabitStore::new(&db);

    match action {
        HabitAction::Add { name } => {
            let habit = Habit::new(name);
            store.save(&habit)?;
            println!("Tracking \"{}\" (id {}).", habit.name, habit.id);
        }
        HabitAction::List => {
            let habits = store.all()?;
            if habits.is_empty() {
                println!("No habits yet.");
            }
            let day = today();
            for habit in habits {
                let milestone = habit.milestone();
                let next = milestone
                    .next_threshold
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "∞".into());
                let done = if habit.checked_in_on(&day) { "✓" } else { " " };
                println!(
                    "[{done}] {} (id {}) -- Lv.{} {} | {}/{} | {}%",
                    habit.name,
                    habit.id,
                    milestone.level,
                    milestone.name,
                    habit.check_in_count(),
                    next,
                    milestone.progress_percent
                );
            }
        }
        HabitAction::CheckIn { id } => match store.check_in(id, clock::now_ms())? {
            HabitCheckIn::Recorded(habit) => {
                println!(
                    "Checked in \"{}\" ({} total).",
                    habit.name,
                    habit.check_in_count()
                );
                run_triggers(
                    &db,
                    Event::HabitCheckedIn {
                        habit_id: habit.id,
                        habit_name: habit.name.clone(),
                        at: Utc::now(),
                    },
                )
                .await;
            }
            HabitCheckIn::AlreadyCheckedInToday(habit) => {
                println!("\"{}\" is already checked in today.", habit.name);
            }
            HabitCheckIn::NotFound => println!("No habit with id {id}."),
        },
        HabitAction::Undo { id } => match store.undo_check_in(id, &today())? {
            Some(habit) => println!(
                "\"{}\" now has {} check-ins.",
                habit.name,
                habit.check_in_count()
            ),
            None => println!("No habit with id {id}."),
        },
        HabitAction::Delete { id } => {
            store.delete(id)?;
            println!("Deleted habit {id}.");
        }
        HabitAction::Report { period } => {
            let period = match period.as_str() {
                "weekly" => ReportPeriod::Weekly,
                "monthly" => ReportPeriod::Monthly,
                other => return Err(format!("unknown period '{other}'").into()),
            };
            for rate in completion_rates(&store.all()?, period, Local::now()) {
                println!("{:>3}%  {}", rate.rate_percent, rate.name);
            }
        }
    }
    Ok(())
}
