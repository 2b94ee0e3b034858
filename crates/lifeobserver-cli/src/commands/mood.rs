//! Mood journal commands.

use chrono::Utc;
use clap::Subcommand;
use lifeobserver_core::storage::{AppState, MoodStore};
use lifeobserver_core::{Database, Event, MoodEntry, MoodEntryKind, NoteAttachment};

use super::common::{run_triggers, today, CliResult};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Write a journal entry
    Add {
        /// Entry body (markdown)
        content: String,
        /// Comma-separated mood tags (happy, grateful, calm, tired, stressed, ...)
        #[arg(long, default_value = "")]
        tags: String,
        /// Entry kind: morning, evening or note
        #[arg(long, default_value = "note")]
        kind: String,
        /// Attach an image file to the entry
        #[arg(long)]
        file: Option<String>,
    },
    /// List entries for a day
    List {
        /// Day to list, YYYY-MM-DD (default: today)
        #[arg(long)]
        day: Option<String>,
    },
    /// Pin or unpin an entry
    Pin {
        /// Entry id
        id: i64,
    },
    /// Delete an entry
    Delete {
        /// Entry id
        id: i64,
    },
}

fn read_attachment(path: &str) -> Result<NoteAttachment, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let mime = match name.rsplit('.').next().unwrap_or("").to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(NoteAttachment::from_bytes(name, mime, &bytes))
}

fn parse_kind(kind: &str) -> Result<MoodEntryKind, String> {
    match kind {
        "morning" => Ok(MoodEntryKind::Morning),
        "evening" => Ok(MoodEntryKind::Evening),
        "note" => Ok(MoodEntryKind::Note),
        other => Err(format!("unknown entry kind '{other}'")),
    }
}

pub async fn run(action: MoodAction) -> CliResult {
    let db = Database::open()?;
    let store = MoodStore::new(&db);

    match action {
        MoodAction::Add {
            content,
            tags,
            kind,
            file,
        } => {
            let tags: Vec<String> = tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            let mut entry = MoodEntry::new(parse_kind(&kind)?, tags, content);
            if let Some(path) = file {
                entry = entry.with_attachment(read_attachment(&path)?);
            }
            store.save(&entry)?;
            println!("Saved entry {} ({})", entry.id, entry.date);

            run_triggers(
                &db,
                Event::MoodEntrySaved {
                    entry_id: entry.id,
                    at: Utc::now(),
                },
            )
            .await;
        }
        MoodAction::List { day } => {
            let day = day.unwrap_or_else(today);
            let pinned = AppState::new(&db).pinned_entries()?;
            let mut entries = store.for_day(&day)?;
            entries.sort_by_key(|e| e.timestamp);
            if entries.is_empty() {
                println!("No entries on {day}.");
            }
            for entry in entries {
                let pin = if pinned.contains(&entry.id) { "📌 " } else { "" };
                println!(
                    "{pin}[{}] {:?} {} | {} | {}",
                    entry.id,
                    entry.kind,
                    entry.time,
                    entry.moods.join(", "),
                    entry.content
                );
            }
        }
        MoodAction::Pin { id } => {
            let now_pinned = AppState::new(&db).toggle_pinned(id)?;
            println!(
                "Entry {id} is now {}.",
                if now_pinned { "pinned" } else { "unpinned" }
            );
        }
        MoodAction::Delete { id } => {
            store.delete(id)?;
            println!("Deleted entry {id}.");
        }
    }
    Ok(())
}
