//! Text-completion client for the hosted Gemini API over HTTPS.
//!
//! `Completer::complete` always resolves with display text: transport and
//! service failures are logged and mapped to canned sentences.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::content::{self, PROFILE};
use crate::error::CompletionError;

pub const DEFAULT_MODEL: &str = "gemini-flash-lite-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const QUOTA_EXCEEDED_REPLY: &str =
    "I'm currently overloaded with requests (Quota Exceeded). Please try again in a minute!";
pub const UNAVAILABLE_REPLY: &str =
    "My AI service is temporarily unavailable. Please try again shortly.";
pub const GENERIC_FAILURE_REPLY: &str = "Error connecting to the AI brain. Please try again later.";
pub const OFFLINE_REPLY: &str =
    "I'm running offline right now. Use the contact form or LinkedIn to reach out directly.";

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Anything that turns a prompt into display text. Never fails.
pub trait Completer: Send + Sync {
    fn complete(&self, prompt: String) -> BoxFuture<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    pub fn new(system_instruction: &str, prompt: &str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Canned sentence shown when the service answers with no text.
pub fn empty_reply() -> String {
    format!(
        "I'm having trouble retrieving that information right now. {} is likely optimizing my backend!",
        PROFILE.name.split(' ').next().unwrap_or(PROFILE.name)
    )
}

pub fn canned_reply(err: &CompletionError) -> &'static str {
    match err {
        CompletionError::Offline => OFFLINE_REPLY,
        _ => match err.status() {
            Some(429) => QUOTA_EXCEEDED_REPLY,
            Some(503) => UNAVAILABLE_REPLY,
            _ => GENERIC_FAILURE_REPLY,
        },
    }
}

/// Map a completion outcome to the text the chat displays.
pub fn display_text(outcome: Result<String, CompletionError>) -> String {
    match outcome {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => empty_reply(),
        Err(e) => {
            error!(error = %e, "completion request failed");
            canned_reply(&e).to_string()
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    system_instruction: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_instruction: content::system_instruction(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let key = self.api_key.as_deref().ok_or(CompletionError::MissingKey)?;
        let body = GenerateRequest::new(&self.system_instruction, prompt);
        debug!(model = %self.model, chars = prompt.len(), "sending completion request");

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed.text())
    }
}

impl Completer for GeminiClient {
    fn complete(&self, prompt: String) -> BoxFuture<String> {
        let client = self.clone();
        Box::pin(async move { display_text(client.generate(&prompt).await) })
    }
}

/// Used with `--offline`: answers immediately without the network.
pub struct OfflineCompleter;

impl Completer for OfflineCompleter {
    fn complete(&self, _prompt: String) -> BoxFuture<String> {
        Box::pin(async { display_text(Err(CompletionError::Offline)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_shape() {
        let req = GenerateRequest::new("be nice", "hello");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "systemInstruction": { "parts": [{ "text": "be nice" }] },
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
            })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "there" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "totalTokenCount": 12 }
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), "Hello there");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[test]
    fn test_status_codes_map_to_canned_replies() {
        assert_eq!(canned_reply(&CompletionError::Status(429)), QUOTA_EXCEEDED_REPLY);
        assert_eq!(canned_reply(&CompletionError::Status(503)), UNAVAILABLE_REPLY);
        assert_eq!(canned_reply(&CompletionError::Status(500)), GENERIC_FAILURE_REPLY);
        assert_eq!(canned_reply(&CompletionError::MissingKey), GENERIC_FAILURE_REPLY);
        assert_eq!(canned_reply(&CompletionError::Offline), OFFLINE_REPLY);
    }

    #[test]
    fn test_display_text_never_fails() {
        assert_eq!(display_text(Ok("Hi".to_string())), "Hi");
        assert_eq!(display_text(Ok("  ".to_string())), empty_reply());
        assert_eq!(display_text(Err(CompletionError::Status(429))), QUOTA_EXCEEDED_REPLY);
    }

    #[test]
    fn test_endpoint_uses_model() {
        let client = GeminiClient::new(Some("k".to_string()), None).with_base_url("http://localhost:9/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/models/gemini-flash-lite-latest:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_resolves_with_generic_reply() {
        let client = GeminiClient::new(Some("   ".to_string()), None);
        assert_eq!(client.complete("hi".to_string()).await, GENERIC_FAILURE_REPLY);
    }

    #[tokio::test]
    async fn test_offline_completer() {
        assert_eq!(OfflineCompleter.complete("hi".to_string()).await, OFFLINE_REPLY);
    }
}
