//! External collaborators: completion, image generation and speech.
//!
//! The core treats every collaborator as an opaque request/response
//! dependency. Calls are never retried here; a rejected call surfaces as a
//! [`CompletionError`] and the caller decides what to answer.

mod openai;
mod synthetic;

pub use openai::OpenAiCompatibleClient;
pub use synthetic::{SyntheticCompletion, SyntheticImageGenerator, SyntheticSpeech};

use crate::types::{CompletionError, CompletionErrorKind};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported collaborator backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompletionBackend {
    /// Deterministic offline collaborator.
    #[default]
    Synthetic,
    /// Any OpenAI-style chat completions endpoint.
    OpenAiCompatible,
}

impl fmt::Display for CompletionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompletionBackend::Synthetic => "synthetic",
            CompletionBackend::OpenAiCompatible => "open_ai_compatible",
        };
        f.write_str(name)
    }
}

/// Role tag of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Which feature issued a request. Used for logging and by offline or
/// scripted collaborators to shape their replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPurpose {
    Conversation,
    Sentiment,
    IdentityMirroring,
    QuantumInsight,
    EthicalChallenge,
    TemporalIntervention,
    MemoryRecall,
    ImagePrompt,
}

/// Request passed to a completion collaborator.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub purpose: CompletionPurpose,
    pub messages: Vec<ChatMessage>,
    /// Ask for a single parseable JSON object.
    pub json: bool,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Single system-instruction request, the shape every feature uses.
    pub fn instruction(purpose: CompletionPurpose, prompt: impl Into<String>) -> Self {
        Self {
            purpose,
            messages: vec![ChatMessage::system(prompt)],
            json: false,
            max_tokens: None,
        }
    }

    pub fn with_messages(purpose: CompletionPurpose, messages: Vec<ChatMessage>) -> Self {
        Self {
            purpose,
            messages,
            json: false,
            max_tokens: None,
        }
    }

    pub fn structured(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Content of the first system message, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
    }
}

/// Options for image generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub aspect_ratio: String,
    pub transparent: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            transparent: true,
        }
    }
}

/// Language-completion collaborator.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    fn backend(&self) -> CompletionBackend;

    /// Produce response text for `request`, or reject.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Image-generation collaborator returning a resource locator.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<String, CompletionError>;
}

/// Speech-synthesis collaborator returning a resource locator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<String, CompletionError>;
}

/// Reply schema of the temporal intervention feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalInterventionReply {
    pub analysis: String,
    pub probability_shift: f64,
    pub positive_outcome: String,
    pub negative_outcome: String,
}

/// Reply schema of the identity mirroring feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirroringReply {
    pub analysis: String,
    pub traits: Vec<String>,
}

/// Reply schema of sentiment analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReply {
    pub sentiment: crate::types::Sentiment,
}

/// Parse a structured reply, tolerating prose around the object and
/// single-quoted keys.
pub fn parse_structured<T: DeserializeOwned>(
    backend: CompletionBackend,
    raw: &str,
) -> Result<T, CompletionError> {
    parse_json_with_normalization(raw).ok_or_else(|| {
        CompletionError::new(
            backend,
            CompletionErrorKind::Parse,
            format!(
                "reply does not match the expected schema: {}",
                trim_for_log(raw)
            ),
        )
    })
}

fn parse_json_with_normalization<T: DeserializeOwned>(raw: &str) -> Option<T> {
    if let Ok(parsed) = serde_json::from_str::<T>(raw.trim()) {
        return Some(parsed);
    }

    let mut candidates = Vec::new();
    if let Some(extracted) = extract_first_json_object(raw) {
        candidates.push(extracted.replace('\'', "\""));
        candidates.push(extracted);
    }
    candidates.push(raw.replace('\'', "\""));

    candidates
        .into_iter()
        .find_map(|candidate| serde_json::from_str::<T>(&candidate).ok())
}

fn extract_first_json_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let mut depth = 0i32;

    for (idx, ch) in raw[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(raw[start..start + idx + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

pub(crate) fn trim_for_log(input: &str) -> String {
    const MAX_LEN: usize = 160;
    let s = input.trim().replace('\n', " ");
    if s.chars().count() > MAX_LEN {
        s.chars().take(MAX_LEN).collect::<String>() + "..."
    } else {
        s
    }
}
