//! AI chat companion: persisted conversation plus cancelable sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::ai::AiResponder;
use crate::error::{CoreError, UpstreamError};
use crate::storage::{ChatLog, Database};

/// Default persona sent with every chat request.
pub const COMPANION_PROMPT: &str = "You are a warm, encouraging companion \
inside a personal journaling app. Reply briefly and conversationally, in \
the language the user writes in.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// One persisted conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Chat failures. Interruption is not an error condition for the user --
/// it renders as an informational note, unlike upstream failures.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("response interrupted")]
    Interrupted,

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// A conversation bound to the persisted history log.
pub struct ChatSession<'a> {
    log: ChatLog<'a>,
    responder: &'a dyn AiResponder,
    history_window: usize,
}

impl<'a> ChatSession<'a> {
    pub fn new(db: &'a Database, responder: &'a dyn AiResponder, history_window: usize) -> Self {
        Self {
            log: ChatLog::new(db),
            responder,
            history_window,
        }
    }

    /// Send a user message and persist both sides of the exchange.
    pub async fn send(&self, text: &str) -> Result<String, ChatError> {
        self.log.append(&ChatMessage::user(text))?;
        self.respond_and_log(COMPANION_PROMPT).await
    }

    /// Like [`send`](Self::send), but raced against an abort signal.
    ///
    /// The user's message is persisted up front; aborting drops the
    /// in-flight request and yields [`ChatError::Interrupted`] with no
    /// assistant turn recorded.
    pub async fn send_cancellable(
        &self,
        text: &str,
        mut cancel: oneshot::Receiver<()>,
    ) -> Result<String, ChatError> {
        self.log.append(&ChatMessage::user(text))?;
        tokio::select! {
            _ = &mut cancel => Err(ChatError::Interrupted),
            result = self.respond_and_log(COMPANION_PROMPT) => result,
        }
    }

    /// Deliver a proactive system instruction (from the trigger engine)
    /// and persist only the assistant's reply.
    pub async fn system_send(&self, system_prompt: &str) -> Result<String, ChatError> {
        self.respond_and_log(system_prompt).await
    }

    async fn respond_and_log(&self, system_prompt: &str) -> Result<String, ChatError> {
        let history = self.log.recent(self.history_window).map_err(CoreError::from)?;
        let reply = self
            .responder
            .respond(system_prompt, &history, None)
            .await?;
        self.log.append(&ChatMessage::assistant(reply.clone()))?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedResponder(&'static str);

    #[async_trait]
    impl AiResponder for CannedResponder {
        async fn respond(
            &self,
            _system_prompt: &str,
            _history: &[ChatMessage],
            _attachment: Option<&crate::mood::NoteAttachment>,
        ) -> Result<String, UpstreamError> {
            Ok(self.0.to_string())
        }
    }

    struct StalledResponder;

    #[async_trait]
    impl AiResponder for StalledResponder {
        async fn respond(
            &self,
            _system_prompt: &str,
            _history: &[ChatMessage],
            _attachment: Option<&crate::mood::NoteAttachment>,
        ) -> Result<String, UpstreamError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn send_persists_both_turns() {
        let db = Database::open_memory().unwrap();
        let responder = CannedResponder("hello back");
        let session = ChatSession::new(&db, &responder, 10);

        let reply = session.send("hello").await.unwrap();
        assert_eq!(reply, "hello back");

        let history = ChatLog::new(&db).all().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn cancelled_send_is_interrupted_not_error() {
        let db = Database::open_memory().unwrap();
        let responder = StalledResponder;
        let session = ChatSession::new(&db, &responder, 10);

        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();
        let result = session.send_cancellable("hello?", rx).await;
        assert!(matches!(result, Err(ChatError::Interrupted)));

        // Only the user turn was persisted.
        let history = ChatLog::new(&db).all().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, ChatRole::User);
    }
}
