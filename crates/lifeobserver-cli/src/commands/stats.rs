//! Derived-statistics commands.

use chrono::Local;
use clap::Subcommand;
use lifeobserver_core::stats::{daily_summary, daily_totals};
use lifeobserver_core::storage::{HabitStore, MoodStore, TaskStore, WorkTimeLog};
use lifeobserver_core::Database;

use super::common::{format_duration, today, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// One-day roll-up across every module
    Summary {
        /// Day to summarize (default: today)
        #[arg(long)]
        day: Option<String>,
    },
    /// Work time per day over a trailing window
    Work {
        /// Number of days to show
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let db = Database::open()?;

    match action {
        StatsAction::Summary { day } => {
            let day = day.unwrap_or_else(today);
            let summary = daily_summary(
                &day,
                &TaskStore::new(&db).all()?,
                &HabitStore::new(&db).all()?,
                &MoodStore::new(&db).all()?,
                &WorkTimeLog::new(&db).all()?,
            );

            println!("── {} ──", summary.date);
            if summary.work_ms > 0 {
                println!("⏰ Clocked time: {}", format_duration(summary.work_ms));
            } else {
                println!("⏰ Clocked time: no records");
            }
            if summary.completed_habits.is_empty() {
                println!("🌱 Habits: none completed");
            } else {
                println!("🌱 Habits: {}", summary.completed_habits.join(", "));
            }
            println!(
                "📝 Tasks: {} of {} done, {} points",
                summary.task_completed, summary.task_total, summary.task_score
            );
            match summary.mood_index {
                Some(index) => println!(
                    "💖 Mood index: {:.1} / 5.0 ({} tags)",
                    index.average, index.tag_count
                ),
                None => println!("💖 Mood index: no data"),
            }
        }
        StatsAction::Work { days } => {
            let records = WorkTimeLog::new(&db).all()?;
            let series = daily_totals(&records, Local::now().date_naive(), days);
            for day in series {
                println!("{}  {}", day.date, format_duration(day.total_ms));
            }
        }
    }
    Ok(())
}
