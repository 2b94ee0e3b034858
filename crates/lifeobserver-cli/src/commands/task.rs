//! Quadrant planner commands.

use chrono::Utc;
use clap::Subcommand;
use lifeobserver_core::stats::{monthly_title, scores_for_day};
use lifeobserver_core::storage::TaskStore;
use lifeobserver_core::{Database, Event, Quadrant, Task};

use super::common::{run_triggers, today, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Schedule a task
    Add {
        /// Task content
        content: String,
        /// Day, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Display time, e.g. "09:30 AM"
        #[arg(long, default_value = "09:00 AM")]
        time: String,
        /// Eisenhower quadrant: A, B, C or D
        #[arg(long, default_value = "B")]
        quadrant: String,
        /// Duration in minutes
        #[arg(long, default_value = "30")]
        duration: u32,
        /// Repeat on these extra days (comma-separated YYYY-MM-DD)
        #[arg(long)]
        repeat: Option<String>,
    },
    /// List tasks for a day
    List {
        /// Day to list (default: today)
        #[arg(long)]
        day: Option<String>,
    },
    /// Toggle a task's completed flag
    Toggle {
        /// Task id
        id: i64,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: i64,
    },
    /// Earned/possible score for a day
    Score {
        /// Day to score (default: today)
        #[arg(long)]
        day: Option<String>,
    },
    /// Monthly score and narrative title
    Title {
        /// Month, YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
}

fn parse_quadrant(s: &str) -> Result<Quadrant, String> {
    Quadrant::parse(s).ok_or_else(|| format!("quadrant must be A, B, C or D (got '{s}')"))
}

pub async fn run(action: TaskAction) -> CliResult {
    let db = Database::open()?;
    let store = TaskStore::new(&db);

    match action {
        TaskAction::Add {
            content,
            date,
            time,
            quadrant,
            duration,
            repeat,
        } => {
            let quadrant = parse_quadrant(&quadrant)?;
            let mut dates = vec![date.unwrap_or_else(today)];
            if let Some(repeat) = repeat {
                dates.extend(
                    repeat
                        .split(',')
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(str::to_string),
                );
            }
            let tasks = Task::batch_recurring(&dates, &time, &content, quadrant, duration);
            store.save_batch(&tasks)?;
            if tasks.len() == 1 {
                println!("Scheduled task {} on {}.", tasks[0].id, tasks[0].date);
            } else {
                println!("Scheduled \"{content}\" on {} days.", tasks.len());
            }
        }
        TaskAction::List { day } => {
            let day = day.unwrap_or_else(today);
            let tasks = store.for_day(&day)?;
            if tasks.is_empty() {
                println!("No tasks on {day}.");
            }
            for task in tasks {
                let mark = if task.completed { "✔" } else { " " };
                println!(
                    "[{mark}] {} (id {}) {} [{:?}] {}min",
                    task.time, task.id, task.content, task.quadrant, task.duration
                );
            }
        }
        TaskAction::Toggle { id } => match store.toggle_completed(id)? {
            Some(task) => {
                println!(
                    "\"{}\" marked {}.",
                    task.content,
                    if task.completed { "done" } else { "open" }
                );
                run_triggers(
                    &db,
                    Event::TaskStateChanged {
                        task_id: task.id,
                        completed: task.completed,
                        at: Utc::now(),
                    },
                )
                .await;
            }
            None => println!("No task with id {id}."),
        },
        TaskAction::Delete { id } => {
            store.delete(id)?;
            println!("Deleted task {id}.");
            run_triggers(
                &db,
                Event::TaskStateChanged {
                    task_id: id,
                    completed: false,
                    at: Utc::now(),
                },
            )
            .await;
        }
        TaskAction::Score { day } => {
            let day = day.unwrap_or_else(today);
            let scores = scores_for_day(&store.all()?, &day);
            println!("{day}: {} / {} points", scores.earned, scores.possible);
        }
        TaskAction::Title { month } => {
            let month = month.unwrap_or_else(|| today()[..7].to_string());
            let tasks = store.all()?;
            let earned: u32 = tasks
                .iter()
                .filter(|t| t.date.starts_with(&month) && t.completed)
                .map(|t| t.quadrant.weight())
                .sum();
            println!("{month}: {earned} points -- \"{}\"", monthly_title(earned));
        }
    }
    Ok(())
}
