//! External AI responder capability.
//!
//! The rest of the crate only sees the [`AiResponder`] trait; the HTTP
//! implementation routes by model name to the matching provider wire
//! format. API keys live in the OS keyring, not in config or exports.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::chat::{ChatMessage, ChatRole};
use crate::error::UpstreamError;
use crate::mood::NoteAttachment;

/// Given a system prompt and recent conversation, produce a reply.
#[async_trait]
pub trait AiResponder: Send + Sync {
    async fn respond(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        attachment: Option<&NoteAttachment>,
    ) -> Result<String, UpstreamError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    Gemini,
    OpenAi,
    Mistral,
    Grok,
}

impl Provider {
    /// Infer the provider from the model name.
    fn for_model(model: &str) -> Result<Self, UpstreamError> {
        if model.contains("gemini") {
            Ok(Provider::Gemini)
        } else if model.contains("gpt") || model.contains("chatgpt") {
            Ok(Provider::OpenAi)
        } else if model.contains("mistral") {
            Ok(Provider::Mistral)
        } else if model.contains("grok") {
            Ok(Provider::Grok)
        } else {
            Err(UpstreamError::UnsupportedModel(model.to_string()))
        }
    }

    fn name(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Mistral => "mistral",
            Provider::Grok => "grok",
        }
    }

    fn default_base(self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com",
            Provider::OpenAi => "https://api.openai.com",
            Provider::Mistral => "https://api.mistral.ai",
            Provider::Grok => "https://api.x.ai",
        }
    }
}

/// HTTP-backed responder. Cancellation is cooperative: dropping the
/// in-flight future aborts the request, so callers race `respond`
/// against an abort signal.
pub struct HttpAiResponder {
    client: reqwest::Client,
    model: String,
    api_key: String,
    base_url: Option<String>,
}

impl HttpAiResponder {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
        }
    }

    /// Point every provider at one base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn base(&self, provider: Provider) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| provider.default_base().to_string())
    }

    fn gemini_body(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        attachment: Option<&NoteAttachment>,
    ) -> Value {
        let mut contents: Vec<Value> = history
            .iter()
            .map(|m| {
                let role = match m.role {
                    ChatRole::Assistant => "model",
                    _ => "user",
                };
                json!({ "role": role, "parts": [{ "text": m.content }] })
            })
            .collect();
        if let Some(file) = attachment {
            // Data URIs carry the payload after the first comma.
            let data = file.data.split_once(',').map(|(_, d)| d).unwrap_or(&file.data);
            contents.push(json!({
                "role": "user",
                "parts": [{ "inline_data": { "mime_type": file.mime, "data": data } }]
            }));
        }
        json!({
            "system_instruction": { "parts": [{ "text": system_prompt }] },
            "contents": contents,
        })
    }

    fn openai_body(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        attachment: Option<&NoteAttachment>,
    ) -> Value {
        let mut messages: Vec<Value> =
            vec![json!({ "role": "system", "content": system_prompt })];
        for m in history {
            let role = match m.role {
                ChatRole::Assistant => "assistant",
                ChatRole::System => "system",
                ChatRole::User => "user",
            };
            messages.push(json!({ "role": role, "content": m.content }));
        }
        if let Some(file) = attachment {
            messages.push(json!({
                "role": "user",
                "content": [{ "type": "image_url", "image_url": { "url": file.data } }]
            }));
        }
        json!({ "model": self.model, "messages": messages })
    }

    fn extract_text(provider: Provider, body: &Value) -> Result<String, UpstreamError> {
        let text = match provider {
            Provider::Gemini => body
                .pointer("/candidates/0/content/parts/0/text")
                .and_then(Value::as_str),
            _ => body
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str),
        };
        text.map(str::to_string)
            .ok_or(UpstreamError::MalformedResponse {
                provider: provider.name(),
            })
    }
}

#[async_trait]
impl AiResponder for HttpAiResponder {
    async fn respond(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        attachment: Option<&NoteAttachment>,
    ) -> Result<String, UpstreamError> {
        let provider = Provider::for_model(&self.model)?;
        let base = self.base(provider);

        let request = match provider {
            Provider::Gemini => self
                .client
                .post(format!(
                    "{base}/v1beta/models/{}:generateContent",
                    self.model
                ))
                .query(&[("key", self.api_key.as_str())])
                .json(&self.gemini_body(system_prompt, history, attachment)),
            _ => self
                .client
                .post(format!("{base}/v1/chat/completions"))
                .bearer_auth(&self.api_key)
                .json(&self.openai_body(system_prompt, history, attachment)),
        };

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("upstream request failed")
                .to_string();
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Self::extract_text(provider, &body)
    }
}

const KEYRING_SERVICE: &str = "lifeobserver";
const KEYRING_USER: &str = "ai_api_key";

/// Load the stored AI API key from the OS keyring (None if absent).
pub fn load_api_key() -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .ok()?
        .get_password()
        .ok()
}

/// Persist the AI API key to the OS keyring.
pub fn store_api_key(key: &str) -> Result<(), keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?.set_password(key)
}

/// Remove the stored AI API key.
pub fn delete_api_key() -> Result<(), keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?.delete_credential()
}
