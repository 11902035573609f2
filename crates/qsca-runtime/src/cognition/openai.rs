use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{
    trim_for_log, CompletionBackend, CompletionClient, CompletionRequest, ImageGenerator,
    ImageOptions,
};
use crate::config::CompletionConfig;
use crate::types::{CompletionError, CompletionErrorKind};

const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_IMAGE_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";

#[derive(Debug, Deserialize)]
struct ChatMessageBody {
    content: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageBody,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
    b64_json: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

/// Collaborator for OpenAI-style chat completion and image endpoints.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    chat_endpoint: String,
    image_endpoint: String,
    model: String,
    image_model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("chat_endpoint", &self.chat_endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl OpenAiCompatibleClient {
    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                CompletionError::new(
                    CompletionBackend::OpenAiCompatible,
                    CompletionErrorKind::NotConfigured,
                    format!("failed to build HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            chat_endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_CHAT_ENDPOINT.to_string()),
            image_endpoint: config
                .image_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_ENDPOINT.to_string()),
            model: config.model.clone(),
            image_model: config.image_model.clone(),
            api_key: config
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok()),
        })
    }

    fn error(kind: CompletionErrorKind, message: impl Into<String>) -> CompletionError {
        CompletionError::new(CompletionBackend::OpenAiCompatible, kind, message)
    }

    fn api_key(&self) -> Result<&str, CompletionError> {
        self.api_key.as_deref().ok_or_else(|| {
            Self::error(
                CompletionErrorKind::NotConfigured,
                "open_ai_compatible backend requires api_key",
            )
        })
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<reqwest::Response, CompletionError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.api_key()?)
            .json(payload)
            .send()
            .await
            .map_err(|e| Self::error(CompletionErrorKind::Transport, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::error(
                CompletionErrorKind::Status,
                format!("error {}: {}", status, trim_for_log(&body)),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    fn backend(&self) -> CompletionBackend {
        CompletionBackend::OpenAiCompatible
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let mut payload = json!({
            "model": self.model,
            "messages": request.messages,
        });
        if let Some(max_tokens) = request.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }
        if request.json {
            payload["response_format"] = json!({ "type": "json_object" });
        }

        tracing::debug!(purpose = ?request.purpose, model = %self.model, "Sending completion request");

        let body: ChatResponse = self
            .post(&self.chat_endpoint, &payload)
            .await?
            .json()
            .await
            .map_err(|e| Self::error(CompletionErrorKind::Transport, format!("invalid response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Self::error(CompletionErrorKind::Transport, "response had no choices"))?;

        Ok(content_to_text(content))
    }
}

#[async_trait]
impl ImageGenerator for OpenAiCompatibleClient {
    async fn generate_image(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<String, CompletionError> {
        let size = if options.aspect_ratio == "16:9" {
            "1792x1024"
        } else {
            "1024x1024"
        };
        let payload = json!({
            "model": self.image_model,
            "prompt": prompt,
            "size": size,
            "n": 1,
        });

        let body: ImageResponse = self
            .post(&self.image_endpoint, &payload)
            .await?
            .json()
            .await
            .map_err(|e| Self::error(CompletionErrorKind::Transport, format!("invalid image response: {}", e)))?;

        body.data
            .into_iter()
            .next()
            .and_then(|d| {
                d.url
                    .or_else(|| d.b64_json.map(|b64| format!("data:image/png;base64,{}", b64)))
            })
            .ok_or_else(|| Self::error(CompletionErrorKind::Transport, "image response had no data"))
    }
}

/// Chat content may be a plain string or an array of typed parts.
fn content_to_text(content: Value) -> String {
    match content {
        Value::String(text) => text.trim().to_string(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cognition::CompletionPurpose;

    #[test]
    fn content_parts_are_joined() {
        let value = json!([{ "type": "text", "text": "Hello " }, { "type": "text", "text": "there" }]);
        assert_eq!(content_to_text(value), "Hello there");
        assert_eq!(content_to_text(json!("  plain  ")), "plain");
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let mut config = CompletionConfig::default();
        config.api_key = None;
        let mut client = OpenAiCompatibleClient::from_config(&config).unwrap();
        client.api_key = None;

        let err = client
            .complete(&CompletionRequest::instruction(CompletionPurpose::QuantumInsight, "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, CompletionErrorKind::NotConfigured);
    }

    #[test]
    fn debug_output_redacts_key() {
        let mut config = CompletionConfig::default();
        config.api_key = Some("sk-secret".to_string());
        let client = OpenAiCompatibleClient::from_config(&config).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-secret"));
    }
}
