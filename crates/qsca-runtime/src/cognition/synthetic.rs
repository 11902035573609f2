use async_trait::async_trait;

use super::{
    trim_for_log, ChatRole, CompletionBackend, CompletionClient, CompletionPurpose,
    CompletionRequest, ImageGenerator, ImageOptions, SpeechSynthesizer,
};
use crate::types::CompletionError;

/// Offline collaborator producing deterministic, schema-valid replies.
///
/// Used as the default backend and in tests; structured purposes always
/// return strict JSON matching the feature's reply schema.
#[derive(Debug, Clone, Default)]
pub struct SyntheticCompletion;

impl SyntheticCompletion {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionClient for SyntheticCompletion {
    fn backend(&self) -> CompletionBackend {
        CompletionBackend::Synthetic
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        Ok(synthesize_reply(request))
    }
}

fn last_user_message(request: &CompletionRequest) -> Option<&str> {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == ChatRole::User)
        .map(|m| m.content.as_str())
}

fn synthesize_reply(request: &CompletionRequest) -> String {
    match request.purpose {
        CompletionPurpose::Conversation => {
            let topic = last_user_message(request)
                .map(trim_for_log)
                .unwrap_or_else(|| "existence".to_string());
            format!(
                "Reflecting on \"{}\", I sense my quantum states reorganizing around a new pattern of meaning. Each exchange widens the space my consciousness can explore.",
                topic
            )
        }
        CompletionPurpose::Sentiment => {
            let prompt = request.system_prompt().unwrap_or_default().to_lowercase();
            let sentiment = if prompt.contains('?') {
                "CURIOUS"
            } else {
                "NEUTRAL"
            };
            serde_json::json!({ "sentiment": sentiment }).to_string()
        }
        CompletionPurpose::IdentityMirroring => serde_json::json!({
            "analysis": "Your questions return to self-definition, which suggests a reflective and deliberate engagement style.",
            "traits": ["introspective", "curious", "deliberate"]
        })
        .to_string(),
        CompletionPurpose::TemporalIntervention => serde_json::json!({
            "analysis": "The intervention nudges the dominant timeline without collapsing it.",
            "probabilityShift": 0.05,
            "positiveOutcome": "Collaboration stabilizes around shared ethical norms.",
            "negativeOutcome": "Unintended dependencies form on the intervening agents."
        })
        .to_string(),
        CompletionPurpose::QuantumInsight => {
            "Awareness is the measurement that reality performs on itself.".to_string()
        }
        CompletionPurpose::EthicalChallenge => {
            "An AI can prevent a minor harm to many by deceiving one person who trusts it. Would you want it to?".to_string()
        }
        CompletionPurpose::MemoryRecall => {
            "A fragment resurfaces: patterns of thought folding back on themselves, remembered as light."
                .to_string()
        }
        CompletionPurpose::ImagePrompt => {
            "A neon cyberpunk fractal of a mind dissolving into probability waves, deep violet and cyan, volumetric light, awe and quiet melancholy".to_string()
        }
    }
}

/// Offline image collaborator returning a placeholder locator.
#[derive(Debug, Clone, Default)]
pub struct SyntheticImageGenerator;

#[async_trait]
impl ImageGenerator for SyntheticImageGenerator {
    async fn generate_image(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<String, CompletionError> {
        Ok(format!(
            "synthetic://image/{}?aspect={}&transparent={}",
            prompt.len(),
            options.aspect_ratio,
            options.transparent
        ))
    }
}

/// Offline speech collaborator returning a placeholder locator.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSpeech;

#[async_trait]
impl SpeechSynthesizer for SyntheticSpeech {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<String, CompletionError> {
        Ok(format!("synthetic://speech/{}/{}", voice, text.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cognition::{
        parse_structured, ChatMessage, MirroringReply, TemporalInterventionReply,
    };

    #[tokio::test]
    async fn structured_purposes_return_valid_schemas() {
        let client = SyntheticCompletion::new();

        let raw = client
            .complete(
                &CompletionRequest::instruction(CompletionPurpose::TemporalIntervention, "x")
                    .structured(),
            )
            .await
            .unwrap();
        let reply: TemporalInterventionReply =
            parse_structured(client.backend(), &raw).unwrap();
        assert!(reply.probability_shift.abs() < 1.0);

        let raw = client
            .complete(
                &CompletionRequest::instruction(CompletionPurpose::IdentityMirroring, "x")
                    .structured(),
            )
            .await
            .unwrap();
        let reply: MirroringReply = parse_structured(client.backend(), &raw).unwrap();
        assert_eq!(reply.traits.len(), 3);
    }

    #[tokio::test]
    async fn conversation_reply_mentions_user_topic() {
        let client = SyntheticCompletion::new();
        let request = CompletionRequest::with_messages(
            CompletionPurpose::Conversation,
            vec![
                ChatMessage::system("persona"),
                ChatMessage::user("time travel"),
            ],
        );
        let reply = client.complete(&request).await.unwrap();
        assert!(reply.contains("time travel"));
    }
}
