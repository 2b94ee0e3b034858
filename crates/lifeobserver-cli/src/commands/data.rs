//! Backup, restore and wipe commands.

use clap::Subcommand;
use lifeobserver_core::export::{clear_all, export, export_all, import};
use lifeobserver_core::{Collection, Database};

use super::common::{today, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write a JSON backup
    Export {
        /// Output file (default: lifeobserver_backup_<date>.json)
        #[arg(long)]
        out: Option<String>,
        /// Only these collections (comma-separated names)
        #[arg(long)]
        collections: Option<String>,
    },
    /// Restore from a JSON backup, overwriting the collections it names
    Import {
        /// Backup file to read
        file: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete every record in every collection
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N] ");
    std::io::stdout().flush().ok();
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer).ok();
    matches!(answer.trim(), "y" | "Y" | "yes")
}

pub fn run(action: DataAction) -> CliResult {
    let db = Database::open()?;

    match action {
        DataAction::Export { out, collections } => {
            let backup = match collections {
                Some(names) => {
                    let mut wanted = Vec::new();
                    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                        match Collection::from_name(name) {
                            Some(collection) => wanted.push(collection),
                            None => return Err(format!("unknown collection '{name}'").into()),
                        }
                    }
                    export(&db, &wanted)?
                }
                None => export_all(&db)?,
            };

            let path = out.unwrap_or_else(|| format!("lifeobserver_backup_{}.json", today()));
            std::fs::write(&path, serde_json::to_string_pretty(&backup)?)?;
            println!("Exported to {path}.");
        }
        DataAction::Import { file, yes } => {
            let backup: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            if !yes
                && !confirm("Importing OVERWRITES every collection named in the file. Continue?")
            {
                println!("Import cancelled.");
                return Ok(());
            }
            let summary = import(&db, &backup)?;
            for (name, count) in &summary.imported {
                println!("  {name}: {count} records");
            }
            for name in &summary.skipped {
                println!("  {name}: skipped (unknown collection)");
            }
            println!("Import complete.");
        }
        DataAction::Clear { yes } => {
            if !yes && !confirm("This permanently deletes ALL data. Continue?") {
                println!("Nothing deleted.");
                return Ok(());
            }
            clear_all(&db)?;
            println!("All collections cleared.");
        }
    }
    Ok(())
}
