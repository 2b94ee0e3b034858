mod config;
pub mod database;
pub mod migrations;
pub mod repos;

pub use config::Config;
pub use database::{Collection, Database, RecordKey};
pub use repos::{AppState, ChatLog, HabitStore, MoodStore, PunchLog, TaskStore, WorkTimeLog};

use std::path::PathBuf;

/// Returns `~/.config/lifeobserver[-dev]/` based on LIFEOBSERVER_ENV.
///
/// Set LIFEOBSERVER_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LIFEOBSERVER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("lifeobserver-dev")
    } else {
        base_dir.join("lifeobserver")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
