//! AI chat companion commands.

use clap::Subcommand;
use lifeobserver_core::storage::{ChatLog, Config};
use lifeobserver_core::{ChatError, ChatRole, ChatSession, Database};
use tokio::sync::oneshot;

use super::common::{responder, CliResult};

#[derive(Subcommand)]
pub enum ChatAction {
    /// Send a message (Ctrl-C interrupts the pending reply)
    Send {
        /// Message text
        message: String,
    },
    /// Show recent conversation
    History {
        /// How many messages to show
        #[arg(long, default_value = "20")]
        window: usize,
    },
    /// Clear the conversation log
    Clear,
}

pub async fn run(action: ChatAction) -> CliResult {
    let db = Database::open()?;
    let config = Config::load_or_default();

    match action {
        ChatAction::Send { message } => {
            let Some(responder) = responder(&config) else {
                return Err(
                    "no AI API key stored; run `lifeobserver-cli config set-key` first".into(),
                );
            };
            let session = ChatSession::new(&db, &responder, config.ai.history_window);

            // Ctrl-C aborts the in-flight request and leaves the prompt
            // usable; an interrupt is information, not an error.
            let (cancel_tx, cancel_rx) = oneshot::channel();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = cancel_tx.send(());
                }
            });

            match session.send_cancellable(&message, cancel_rx).await {
                Ok(reply) => println!("🤖 {reply}"),
                Err(ChatError::Interrupted) => println!("(response interrupted)"),
                Err(err) => return Err(err.into()),
            }
        }
        ChatAction::History { window } => {
            let messages = ChatLog::new(&db).recent(window)?;
            if messages.is_empty() {
                println!("No conversation yet.");
            }
            for message in messages {
                let who = match message.role {
                    ChatRole::User => "you",
                    ChatRole::Assistant => "ai",
                    ChatRole::System => "system",
                };
                println!("[{who}] {}", message.content);
            }
        }
        ChatAction::Clear => {
            ChatLog::new(&db).clear()?;
            println!("Conversation cleared.");
        }
    }
    Ok(())
}
