//! Configuration commands.

use clap::Subcommand;
use lifeobserver_core::ai;
use lifeobserver_core::storage::Config;

use super::common::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the whole configuration
    Show,
    /// Get one value by dot-separated key
    Get {
        /// Key, e.g. attendance.work_hours
        key: String,
    },
    /// Set one value by dot-separated key
    Set {
        /// Key, e.g. attendance.break_minutes
        key: String,
        /// New value
        value: String,
    },
    /// Store the AI API key in the OS keyring
    SetKey {
        /// The API key for the configured model's provider
        key: String,
    },
    /// Remove the stored AI API key
    ClearKey,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            let key_state = if ai::load_api_key().is_some() {
                "stored in keyring"
            } else {
                "not set"
            };
            println!("# ai api key: {key_state}");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
        }
        ConfigAction::SetKey { key } => {
            ai::store_api_key(&key)?;
            println!("API key stored in the OS keyring.");
        }
        ConfigAction::ClearKey => {
            ai::delete_api_key()?;
            println!("API key removed.");
        }
    }
    Ok(())
}
