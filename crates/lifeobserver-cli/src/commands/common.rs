//! Shared helpers for CLI commands.

use chrono::Local;
use lifeobserver_core::storage::Config;
use lifeobserver_core::triggers::TriggerEngine;
use lifeobserver_core::{ai, Database, Event, HttpAiResponder};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Today's local calendar day.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Render a millisecond duration as `Xh Ym`.
pub fn format_duration(ms: i64) -> String {
    let minutes = ms / 60_000;
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Build the HTTP responder from config + keyring, or explain why not.
pub fn responder(config: &Config) -> Option<HttpAiResponder> {
    match ai::load_api_key() {
        Some(key) => Some(HttpAiResponder::new(config.ai.model.clone(), key)),
        None => {
            tracing::debug!("no AI API key stored; proactive messages disabled");
            None
        }
    }
}

/// Evaluate proactive triggers for an event and print whatever fires.
///
/// Runs after the user action already committed; trigger problems are
/// reported but never fail the command.
pub async fn run_triggers(db: &Database, event: Event) {
    let config = Config::load_or_default();
    let Some(responder) = responder(&config) else {
        return;
    };

    let mut engine = TriggerEngine::load(db, config.ai.history_window);
    for fired in engine
        .evaluate(db, &event, &responder, Local::now())
        .await
    {
        match fired.reply {
            Ok(reply) => println!("\n🤖 {reply}"),
            Err(err) => eprintln!("AI message failed ({}): {err}", fired.rule_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "0h 00m");
        assert_eq!(format_duration(30_600_000), "8h 30m");
        assert_eq!(format_duration(59_000), "0h 00m");
    }
}
