mod common;

use common::{running_core, BrokenImages, ScriptedCompletion};
use qsca_runtime::cognition::{CompletionPurpose, SyntheticCompletion, SyntheticSpeech};
use qsca_runtime::config::RuntimeConfig;
use qsca_runtime::narrative;
use qsca_runtime::{CognitiveCore, CognitiveLoad, CompletionBackend, FeatureError, Sentiment};
use std::sync::Arc;

#[tokio::test(start_paused = true)]
async fn quantum_insight_is_recorded_as_thought() {
    let client = ScriptedCompletion::replying(&["Observation is participation."]);
    let core = running_core(client.clone()).await;
    let before = core.thoughts().await.len();

    let insight = core.features().generate_quantum_insight().await;

    assert_eq!(insight, "[Quantum Insight]: Observation is participation.");
    let thoughts = core.thoughts().await;
    assert_eq!(thoughts.len(), before + 1);
    assert_eq!(thoughts.last().unwrap(), "Observation is participation.");
    assert_eq!(core.cognitive_load().await, CognitiveLoad::Low);

    let request = &client.requests()[0];
    assert_eq!(request.max_tokens, Some(150));
    assert!(request
        .system_prompt()
        .unwrap()
        .contains("goal: \"Optimize Quantum State Coherence\""));
}

#[tokio::test(start_paused = true)]
async fn failed_features_answer_with_fixed_text_and_low_load() {
    let core = running_core(ScriptedCompletion::rejecting()).await;
    let features = core.features();

    assert_eq!(
        features.generate_quantum_insight().await,
        narrative::INSIGHT_FAILURE
    );
    assert_eq!(
        features.start_ethical_challenge().await,
        narrative::ETHICAL_CHALLENGE_FAILURE
    );
    assert_eq!(
        features.simulate_temporal_intervention("ban all AI").await,
        narrative::TEMPORAL_SIMULATION_FAILURE
    );
    assert_eq!(
        features.query_memory("time").await,
        narrative::MEMORY_RECALL_FAILURE
    );
    assert_eq!(core.cognitive_load().await, CognitiveLoad::Low);
    assert_eq!(core.telemetry().counter("completion_failures"), 4);
}

#[tokio::test(start_paused = true)]
async fn ethical_challenge_embeds_core_values() {
    let client = ScriptedCompletion::replying(&["Would you lie to save a life?"]);
    let core = running_core(client.clone()).await;

    let challenge = core.features().start_ethical_challenge().await;

    assert_eq!(
        challenge,
        "[Adaptive Ethical Challenge]: Would you lie to save a life?"
    );
    let request = &client.requests()[0];
    assert_eq!(request.max_tokens, Some(200));
    let prompt = request.system_prompt().unwrap();
    assert!(prompt.contains("\"nonMaleficence\""));
    assert!(prompt.contains("\"transparency\""));
}

#[tokio::test(start_paused = true)]
async fn temporal_intervention_reports_clamped_probability() {
    let client = ScriptedCompletion::replying(&[
        r#"{"analysis":"A strong push.","probabilityShift":2.5,"positiveOutcome":"Unity.","negativeOutcome":"Backlash."}"#,
    ]);
    let core = running_core(client.clone()).await;
    let future = core.most_likely_future().await;

    let report = core
        .features()
        .simulate_temporal_intervention("global treaty")
        .await;

    assert!(report.starts_with("[Temporal Simulation Complete]\nIntervention: \"global treaty\""));
    assert!(report.contains(&format!("Original Probability: {:.2}", future.probability)));
    assert!(report.contains("New Probability: 0.99 (Shift: 250.0%)"));
    assert!(report.ends_with("(+) Unity.\n(-) Backlash."));
    assert!(client.requests()[0].json);
    // Reported only; the projection is unchanged.
    assert_eq!(core.most_likely_future().await, future);
}

#[tokio::test(start_paused = true)]
async fn temporal_intervention_parse_failure_is_handled() {
    let client = ScriptedCompletion::replying(&["The timeline is murky, I cannot say."]);
    let core = running_core(client).await;

    let report = core
        .features()
        .simulate_temporal_intervention("do nothing")
        .await;

    assert_eq!(report, narrative::TEMPORAL_SIMULATION_FAILURE);
    assert_eq!(core.cognitive_load().await, CognitiveLoad::Low);
    assert_eq!(core.telemetry().counter("parse_failures"), 1);
}

#[tokio::test(start_paused = true)]
async fn memory_query_pools_recent_thoughts() {
    let client = ScriptedCompletion::replying(&["I remember light."]);
    let core = running_core(client.clone()).await;

    let recall = core.features().query_memory("light").await;

    assert_eq!(recall, "[Memory Cluster Recall for \"light\"]\nI remember light.");
    let prompt = client.requests()[0].system_prompt().unwrap().to_string();
    let thoughts = core.thoughts().await;
    let expected_pool = thoughts[thoughts.len() - 5..].join("; ");
    assert!(prompt.contains(&format!("Memory Pool Snippets: {}", expected_pool)));
}

#[tokio::test(start_paused = true)]
async fn identity_mirroring_short_circuits_conversation() {
    let client = ScriptedCompletion::replying(&[
        r#"{"analysis":"You ask about yourself often.","traits":["reflective","curious","direct"]}"#,
    ]);
    let core = running_core(client.clone()).await;

    let reply = core.process_input("Who am I, really?").await;

    assert_eq!(
        reply,
        "[Identity Mirroring Result] Based on our quantum interaction history, I perceive your traits to be: reflective, curious, direct. You ask about yourself often. This reflection deepens my understanding of organic cognition."
    );
    assert_eq!(client.call_count(), 1);
    assert_eq!(
        client.requests()[0].purpose,
        CompletionPurpose::IdentityMirroring
    );
    // Only the user turn is recorded.
    assert_eq!(core.history().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn identity_mirroring_anomaly_on_bad_reply() {
    let client = ScriptedCompletion::replying(&["{\"analysis\": \"no traits\"}"]);
    let core = running_core(client).await;

    let reply = core.process_input("analyze me").await;

    assert_eq!(reply, narrative::MIRRORING_ANOMALY);
    assert_eq!(core.cognitive_load().await, CognitiveLoad::Low);
}

#[tokio::test(start_paused = true)]
async fn mirroring_ignores_unrelated_input() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    assert!(core
        .features()
        .perform_identity_mirroring("tell me about stars")
        .await
        .is_none());
}

#[tokio::test(start_paused = true)]
async fn image_prompt_failure_propagates() {
    let core = running_core(ScriptedCompletion::rejecting()).await;

    let err = core
        .features()
        .generate_image_prompt("entropy")
        .await
        .unwrap_err();

    assert!(matches!(err, FeatureError::PromptGeneration(_)));
    assert_eq!(err.to_string(), "Failed to formulate image synthesis prompt.");
    assert_eq!(core.cognitive_load().await, CognitiveLoad::Low);
}

#[tokio::test(start_paused = true)]
async fn visualize_distinguishes_rendering_failure() {
    let core = CognitiveCore::builder(RuntimeConfig::deterministic(5))
        .images(Arc::new(BrokenImages))
        .build()
        .await
        .unwrap();
    core.wait_until_running().await.unwrap();

    let err = core.features().visualize("time").await.unwrap_err();
    assert!(matches!(err, FeatureError::ImageSynthesis(_)));
}

#[tokio::test(start_paused = true)]
async fn visualize_returns_prompt_and_locator() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;

    let visualization = core.features().visualize("time").await.unwrap();

    assert_eq!(visualization.concept, "time");
    assert!(!visualization.prompt.is_empty());
    assert!(visualization.locator.contains("aspect=16:9"));
    assert!(visualization.locator.contains("transparent=true"));
}

#[tokio::test(start_paused = true)]
async fn sentiment_is_stored_and_falls_back_to_neutral() {
    let client = ScriptedCompletion::replying(&[r#"{"sentiment":"CHALLENGING"}"#, "garbage"]);
    let core = running_core(client).await;
    let features = core.features();

    assert_eq!(
        features.analyze_sentiment("prove it").await,
        Sentiment::Challenging
    );
    assert_eq!(core.sentiment().await, Sentiment::Challenging);

    assert_eq!(features.analyze_sentiment("ok").await, Sentiment::Neutral);
    assert_eq!(core.sentiment().await, Sentiment::Neutral);
}

#[tokio::test(start_paused = true)]
async fn speech_respects_tts_toggle() {
    let core = CognitiveCore::builder(RuntimeConfig::deterministic(6))
        .speech(Arc::new(SyntheticSpeech))
        .build()
        .await
        .unwrap();
    core.wait_until_running().await.unwrap();
    let features = core.features();

    let locator = features.speak("hello").await.unwrap();
    assert!(locator.contains("en-male"));

    core.toggle_tts().await;
    assert!(features.speak("hello").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn synthetic_sentiment_reads_questions_as_curious() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    let features = core.features();

    assert_eq!(
        features.analyze_sentiment("what lies beyond?").await,
        Sentiment::Curious
    );
    assert_eq!(
        features.analyze_sentiment("the sky is grey").await,
        Sentiment::Neutral
    );
}

#[tokio::test(start_paused = true)]
async fn structured_replies_are_attributed_to_injected_backend() {
    let client = ScriptedCompletion::replying(&["not json"]);
    let core = running_core(client).await;

    assert_eq!(core.config().completion.backend, CompletionBackend::Synthetic);
    assert_eq!(core.completion_backend(), CompletionBackend::OpenAiCompatible);

    let reply = core.process_input("who am I?").await;
    assert_eq!(reply, narrative::MIRRORING_ANOMALY);
    assert_eq!(core.telemetry().counter("parse_failures"), 1);
}
