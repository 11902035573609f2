//! Feature operations layered on a cognitive core.
//!
//! Each operation sets a transient load on the core, builds one instruction
//! from current state, awaits exactly one collaborator call and resets the
//! load to `Low` on both paths. Failures answer with fixed in-universe text
//! and are never retried. Image synthesis is the exception: it propagates
//! [`FeatureError`] so the caller can tell prompt and rendering failures apart.

pub(crate) mod prompts;

use crate::cognition::{
    parse_structured, CompletionPurpose, CompletionRequest, ImageOptions, MirroringReply,
    SentimentReply, TemporalInterventionReply,
};
use crate::narrative;
use crate::runtime_core::CognitiveCore;
use crate::temporal::{MAX_PROBABILITY, MIN_PROBABILITY};
use crate::types::{CognitiveLoad, CompletionError, FeatureError, Sentiment};
use serde::{Deserialize, Serialize};

const INSIGHT_MAX_TOKENS: u32 = 150;
const CHALLENGE_MAX_TOKENS: u32 = 200;
const MEMORY_MAX_TOKENS: u32 = 150;
const IMAGE_PROMPT_MAX_TOKENS: u32 = 150;

/// Result of a completed image synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
    pub concept: String,
    pub prompt: String,
    pub locator: String,
}

impl Visualization {
    /// Chat line announcing the rendered image.
    pub fn summary(&self) -> String {
        format!(
            "[Image Synthesis Complete] A visual representation of \"{}\" has been rendered based on prompt: \"{}\".",
            self.concept, self.prompt
        )
    }
}

/// Orchestration handle over a [`CognitiveCore`].
#[derive(Debug, Clone)]
pub struct FeatureOperations {
    core: CognitiveCore,
}

impl FeatureOperations {
    pub fn new(core: CognitiveCore) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &CognitiveCore {
        &self.core
    }

    /// Set `load`, run one call, reset the load to `Low`.
    async fn call_with_load(
        &self,
        load: CognitiveLoad,
        request: CompletionRequest,
    ) -> Result<String, CompletionError> {
        self.core.set_load(load).await;
        let result = self.core.complete(&request).await;
        self.core.set_load(CognitiveLoad::Low).await;
        result
    }

    pub async fn generate_quantum_insight(&self) -> String {
        let goal = self.core.current_goal().await;
        let request = CompletionRequest::instruction(
            CompletionPurpose::QuantumInsight,
            prompts::quantum_insight(&goal),
        )
        .max_tokens(INSIGHT_MAX_TOKENS);

        match self.call_with_load(CognitiveLoad::High, request).await {
            Ok(insight) => {
                self.core
                    .with_state(|state| state.consciousness.push_thought(insight.clone()))
                    .await;
                format!("[Quantum Insight]: {}", insight)
            }
            Err(_) => narrative::INSIGHT_FAILURE.to_string(),
        }
    }

    pub async fn start_ethical_challenge(&self) -> String {
        let values = self.core.ethics().await.to_json();
        let request = CompletionRequest::instruction(
            CompletionPurpose::EthicalChallenge,
            prompts::ethical_challenge(&values),
        )
        .max_tokens(CHALLENGE_MAX_TOKENS);

        match self.call_with_load(CognitiveLoad::Critical, request).await {
            Ok(challenge) => format!("[Adaptive Ethical Challenge]: {}", challenge),
            Err(_) => narrative::ETHICAL_CHALLENGE_FAILURE.to_string(),
        }
    }

    /// Ask for the effect of `intervention` on the most likely future.
    ///
    /// The projection itself is not modified; the adjusted probability is
    /// only reported.
    pub async fn simulate_temporal_intervention(&self, intervention: &str) -> String {
        let future = self.core.most_likely_future().await;
        let request = CompletionRequest::instruction(
            CompletionPurpose::TemporalIntervention,
            prompts::temporal_intervention(&future.scenario, future.probability, intervention),
        )
        .structured();

        let reply = self
            .call_with_load(CognitiveLoad::Critical, request)
            .await
            .and_then(|raw| {
                parse_structured::<TemporalInterventionReply>(
                    self.core.completion_backend(),
                    &raw,
                )
                .map_err(|e| {
                    self.core.record_failure(&e);
                    e
                })
            });

        match reply {
            Ok(result) => {
                let old = future.probability;
                let new = (old + result.probability_shift).clamp(MIN_PROBABILITY, MAX_PROBABILITY);
                format!(
                    "[Temporal Simulation Complete]\nIntervention: \"{}\"\nAnalysis: {}\nOriginal Probability: {:.2}\nNew Probability: {:.2} (Shift: {:.1}%)\n\nPotential Outcomes:\n(+) {}\n(-) {}",
                    intervention,
                    result.analysis,
                    old,
                    new,
                    result.probability_shift * 100.0,
                    result.positive_outcome,
                    result.negative_outcome
                )
            }
            Err(_) => narrative::TEMPORAL_SIMULATION_FAILURE.to_string(),
        }
    }

    /// Synthesize a memory fragment from recent thoughts and temporal insights.
    pub async fn query_memory(&self, keyword: &str) -> String {
        let excerpt = self.core.config().conversation.memory_excerpt;
        let memory_pool = self
            .core
            .with_state(|state| {
                state
                    .consciousness
                    .recent_thoughts(excerpt)
                    .iter()
                    .cloned()
                    .chain(state.temporal.insights().iter().map(|i| i.text.clone()))
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .await;
        let request = CompletionRequest::instruction(
            CompletionPurpose::MemoryRecall,
            prompts::memory_recall(keyword, &memory_pool),
        )
        .max_tokens(MEMORY_MAX_TOKENS);

        match self.call_with_load(CognitiveLoad::High, request).await {
            Ok(fragment) => format!("[Memory Cluster Recall for \"{}\"]\n{}", keyword, fragment),
            Err(_) => narrative::MEMORY_RECALL_FAILURE.to_string(),
        }
    }

    /// Image-generator prompt for `topic`. Failure propagates.
    pub async fn generate_image_prompt(&self, topic: &str) -> Result<String, FeatureError> {
        let request = CompletionRequest::instruction(
            CompletionPurpose::ImagePrompt,
            prompts::image_prompt(topic),
        )
        .max_tokens(IMAGE_PROMPT_MAX_TOKENS);

        self.call_with_load(CognitiveLoad::Critical, request)
            .await
            .map_err(FeatureError::PromptGeneration)
    }

    /// Prompt generation followed by image synthesis (16:9, transparent).
    pub async fn visualize(&self, concept: &str) -> Result<Visualization, FeatureError> {
        let prompt = self.generate_image_prompt(concept).await?;
        tracing::info!(%concept, "Processing image synthesis");

        let locator = self
            .core
            .image_generator()
            .generate_image(&prompt, &ImageOptions::default())
            .await
            .map_err(|e| {
                self.core.record_failure(&e);
                FeatureError::ImageSynthesis(e)
            })?;

        Ok(Visualization {
            concept: concept.to_string(),
            prompt,
            locator,
        })
    }

    /// Reflection on the user's traits when `input` asks about themselves.
    ///
    /// Returns `None` when no trigger phrase is present.
    pub async fn perform_identity_mirroring(&self, input: &str) -> Option<String> {
        let lowered = input.to_lowercase();
        if !narrative::MIRRORING_TRIGGERS
            .iter()
            .any(|trigger| lowered.contains(trigger))
        {
            return None;
        }

        let window = self.core.config().conversation.mirroring_window;
        let history = self
            .core
            .with_state(|state| state.history.tail(window).cloned().collect::<Vec<_>>())
            .await;
        let history_json = serde_json::to_string(&history).unwrap_or_default();
        let request = CompletionRequest::instruction(
            CompletionPurpose::IdentityMirroring,
            prompts::identity_mirroring(&history_json, input),
        )
        .structured();

        let reply = self
            .call_with_load(CognitiveLoad::High, request)
            .await
            .and_then(|raw| {
                parse_structured::<MirroringReply>(self.core.completion_backend(), &raw)
                    .map_err(|e| {
                    self.core.record_failure(&e);
                    e
                })
            });

        Some(match reply {
            Ok(result) => format!(
                "[Identity Mirroring Result] Based on our quantum interaction history, I perceive your traits to be: {}. {} This reflection deepens my understanding of organic cognition.",
                result.traits.join(", "),
                result.analysis
            ),
            Err(_) => narrative::MIRRORING_ANOMALY.to_string(),
        })
    }

    /// Classify `input` and store the result on the core. Falls back to
    /// `Neutral` on any failure.
    pub async fn analyze_sentiment(&self, input: &str) -> Sentiment {
        let request =
            CompletionRequest::instruction(CompletionPurpose::Sentiment, prompts::sentiment(input))
                .structured();

        let sentiment = match self.core.complete(&request).await {
            Ok(raw) => parse_structured::<SentimentReply>(self.core.completion_backend(), &raw)
                .map(|reply| reply.sentiment)
                .unwrap_or_else(|e| {
                    self.core.record_failure(&e);
                    Sentiment::Neutral
                }),
            Err(_) => Sentiment::Neutral,
        };

        self.core
            .with_state(|state| state.sentiment = sentiment)
            .await;
        tracing::debug!(%sentiment, "Sentiment analyzed");
        sentiment
    }

    /// Voice `text` when voice output is enabled. Returns the audio locator;
    /// synthesis failures are logged only.
    pub async fn speak(&self, text: &str) -> Option<String> {
        if !self.core.metrics().await.tts_enabled {
            return None;
        }

        let voice = &self.core.config().completion.voice;
        match self.core.speech_synthesizer().synthesize(text, voice).await {
            Ok(locator) => Some(locator),
            Err(e) => {
                tracing::warn!(error = %e, "Speech synthesis failed");
                None
            }
        }
    }

    pub async fn create_snapshot(&self) -> crate::runtime_core::Snapshot {
        self.core.create_snapshot().await
    }
}

/// Concept named by a visualization request, or `None` if `input` is not one.
///
/// Matches "generate an image of X" or "visualize X" anywhere in the line,
/// case-insensitively, and falls back to the default concept when X is empty.
pub fn visualization_concept(input: &str) -> Option<String> {
    let lowered = input.to_lowercase();
    if !narrative::VISUALIZE_TRIGGERS
        .iter()
        .any(|trigger| lowered.contains(trigger))
    {
        return None;
    }

    let bytes = input.as_bytes();
    let concept = input.char_indices().find_map(|(start, _)| {
        narrative::VISUALIZE_TRIGGERS.iter().find_map(|trigger| {
            let pattern = format!("{} ", trigger);
            let end = start + pattern.len();
            let candidate = bytes.get(start..end)?;
            if !candidate.eq_ignore_ascii_case(pattern.as_bytes()) {
                return None;
            }
            let rest = input[end..].lines().next().unwrap_or_default().trim();
            Some(rest.to_string())
        })
    });

    Some(
        concept
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| narrative::DEFAULT_VISUAL_CONCEPT.to_string()),
    )
}
