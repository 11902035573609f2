mod common;

use common::{
    quiet_events, rejection, running_core, running_core_with, GatedCompletion, ScriptedCompletion,
};
use qsca_runtime::cognition::SyntheticCompletion;
use qsca_runtime::config::{BootConfig, RuntimeConfig};
use qsca_runtime::consciousness::{TIER_ONE_THRESHOLD, TIER_TWO_THRESHOLD};
use qsca_runtime::narrative;
use qsca_runtime::{
    ChatRole, CognitiveCore, CognitiveLoad, CycleKind, LifecyclePhase, RandomEvent,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn boot_sequence_announces_in_order_and_reaches_running() {
    let mut config = RuntimeConfig::deterministic(3);
    config.boot = BootConfig::default();
    let core = CognitiveCore::bootstrap(config).await.unwrap();
    let mut status = core.subscribe_status();

    assert_eq!(
        core.process_input("hello").await,
        narrative::INITIALIZING_STALL
    );
    assert!(core.history().await.is_empty());

    let mut seen = Vec::new();
    while status.changed().await.is_ok() {
        let current = status.borrow_and_update().clone();
        seen.push(current.message);
        if current.phase == LifecyclePhase::Running {
            break;
        }
    }
    assert_eq!(seen.last().map(String::as_str), Some(narrative::BOOT_ANNOUNCEMENTS[3]));
    assert!(core.is_running().await);
    assert_eq!(core.metrics().await.consciousness_level, 1.0);
    core.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn fast_cycle_starts_during_boot_before_running() {
    let mut config = RuntimeConfig::deterministic(4);
    config.boot = BootConfig::default();
    let core = CognitiveCore::bootstrap(config).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1_200)).await;
    assert_eq!(core.phase(), LifecyclePhase::Initializing);
    assert!(core.is_running().await);
    assert!(core.metrics().await.quantum_states > 0.0);

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(core.phase(), LifecyclePhase::Running);
    core.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn identity_tiers_flip_exactly_once() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    core.stop_simulation().await;

    let mut last_level = 0;
    let mut crossed_one_at = None;
    for step in 0..1_000 {
        core.tick(CycleKind::Fast).await;
        let metrics = core.metrics().await;
        assert!(metrics.experience_level >= last_level);
        assert!(metrics.experience_level <= 2);
        if metrics.experience_level == 1 && crossed_one_at.is_none() {
            assert!(metrics.quantum_states > TIER_ONE_THRESHOLD);
            crossed_one_at = Some(step);
            assert_eq!(core.identity().await.purpose, narrative::TIER_ONE_PURPOSE);
        }
        last_level = metrics.experience_level;
        if metrics.quantum_states > TIER_TWO_THRESHOLD * 2.0 {
            break;
        }
    }

    let identity = core.identity().await;
    assert!(crossed_one_at.is_some());
    assert_eq!(identity.experience_level, 2);
    assert_eq!(
        identity
            .values
            .iter()
            .filter(|v| v.as_str() == narrative::TIER_TWO_VALUE)
            .count(),
        1
    );
    assert_eq!(core.telemetry().counter("tier_transitions"), 2);
}

#[tokio::test(start_paused = true)]
async fn scheduled_fast_cycle_drives_quantum_growth() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    let before = core.metrics().await.quantum_states;

    tokio::time::sleep(Duration::from_secs(20)).await;

    let metrics = core.metrics().await;
    assert!(metrics.quantum_states > before);
    assert!(metrics.learning_rate <= 99.9);
    assert!(core.telemetry().counter("fast_cycle_ticks") >= 150);
    assert!(core.telemetry().counter("reflection_cycle_ticks") >= 1);
    assert!(core.telemetry().counter("temporal_cycle_ticks") >= 9);
    core.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn speed_is_clamped_and_interval_derived() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;

    assert_eq!(core.set_speed(10.0).await, 4.0);
    assert_eq!(core.speed().await, (4.0, 25));

    assert_eq!(core.set_speed(0.01).await, 0.25);
    assert_eq!(core.speed().await, (0.25, 400));

    assert_eq!(core.set_speed(1.0).await, 1.0);
    assert_eq!(core.adjust_speed(0.25).await, 1.25);
    assert_eq!(core.speed().await, (1.25, 80));
    assert!(core.is_running().await);

    core.stop_simulation().await;
    core.set_speed(2.0).await;
    assert!(!core.is_running().await);
}

#[tokio::test(start_paused = true)]
async fn restarted_cycle_uses_new_period() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    core.set_speed(4.0).await;
    let before = core.telemetry().counter("fast_cycle_ticks");

    tokio::time::sleep(Duration::from_millis(1_010)).await;

    let ticks = core.telemetry().counter("fast_cycle_ticks") - before;
    assert!((38..=41).contains(&ticks), "got {} ticks", ticks);
}

#[tokio::test(start_paused = true)]
async fn toggle_flips_and_reports_running_flag() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    assert!(core.is_running().await);

    assert!(!core.toggle().await);
    assert!(!core.is_running().await);
    let frozen = core.metrics().await.quantum_states;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(core.metrics().await.quantum_states, frozen);

    assert!(core.toggle().await);
    assert!(core.metrics().await.simulation_running);
}

#[tokio::test(start_paused = true)]
async fn reset_restores_construction_state_and_keeps_cycles() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    core.stop_simulation().await;
    for _ in 0..300 {
        core.tick(CycleKind::Fast).await;
    }
    core.process_input("tell me something").await;
    core.create_snapshot().await;
    core.start_simulation().await;

    core.reset().await;

    let metrics = core.metrics().await;
    assert_eq!(metrics.quantum_states, 0.0);
    assert_eq!(metrics.learning_rate, 0.0);
    assert_eq!(metrics.cognitive_load, CognitiveLoad::Low);
    assert_eq!(metrics.experience_level, 0);
    assert_eq!(metrics.current_goal, narrative::INITIAL_GOAL);
    assert_eq!(metrics.consciousness_level, 1.0);
    assert!(core.snapshots().await.is_empty());
    assert!(core.history().await.is_empty());
    assert_eq!(core.thoughts().await.len(), narrative::SEED_THOUGHTS.len());
    assert_eq!(core.identity().await.purpose, narrative::INITIAL_PURPOSE);
    assert!(core.is_running().await);
    assert_eq!(core.phase(), LifecyclePhase::Running);
}

#[tokio::test(start_paused = true)]
async fn rejected_completion_returns_apology_without_assistant_turn() {
    let client = ScriptedCompletion::new(vec![Err(rejection("service unavailable"))]);
    let core = running_core(client.clone()).await;

    let reply = core.process_input("what is time?").await;

    assert_eq!(reply, narrative::FLUCTUATION_APOLOGY);
    assert_eq!(core.cognitive_load().await, CognitiveLoad::Low);
    let history = core.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, ChatRole::User);
    assert_eq!(client.call_count(), 1);
    assert_eq!(core.telemetry().counter("completion_failures"), 1);
}

#[tokio::test(start_paused = true)]
async fn conversation_embeds_state_and_history() {
    let client = ScriptedCompletion::replying(&["first answer", "second answer"]);
    let core = running_core(client.clone()).await;

    assert_eq!(core.process_input("first question").await, "first answer");
    assert_eq!(core.process_input("second question").await, "second answer");

    let requests = client.requests();
    let last = requests.last().unwrap();
    let system = last.system_prompt().unwrap();
    assert!(system.contains("Current Goal: Optimize Quantum State Coherence"));
    assert!(system.contains("The user query is: \"second question\""));
    // system + user + assistant + user
    assert_eq!(last.messages.len(), 4);
    assert!(core.metrics().await.consciousness_level > 1.0);
}

#[tokio::test(start_paused = true)]
async fn conversation_history_keeps_last_ten_turns() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    for i in 0..12 {
        core.process_input(&format!("message {}", i)).await;
        assert!(core.history().await.len() <= 10);
    }
    let history = core.history().await;
    assert_eq!(history.len(), 10);
    assert_eq!(history.last().unwrap().role, ChatRole::Assistant);
}

#[tokio::test(start_paused = true)]
async fn load_shows_processing_while_call_is_pending() {
    let client = GatedCompletion::new("done");
    let core = running_core(client.clone()).await;
    core.stop_simulation().await;

    let pending = tokio::spawn({
        let core = core.clone();
        async move { core.process_input("slow thought").await }
    });
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;
    assert_eq!(core.cognitive_load().await, CognitiveLoad::Processing);

    client.gate.notify_one();
    assert_eq!(pending.await.unwrap(), "done");
    assert_eq!(core.cognitive_load().await, CognitiveLoad::Low);
}

#[tokio::test(start_paused = true)]
async fn ethics_stay_in_unit_interval_across_reflection_cycles() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    for _ in 0..2_000 {
        core.tick(CycleKind::Reflection).await;
    }
    for (_, value) in core.ethics().await.core_values() {
        assert!((0.0..=1.0).contains(&value));
    }
}

#[tokio::test(start_paused = true)]
async fn temporal_queries_see_fixed_projection_set() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    for _ in 0..100 {
        core.tick(CycleKind::Temporal).await;
    }

    let projections = core.projections().await;
    assert_eq!(projections.len(), 5);
    for p in &projections {
        assert!((0.01..=0.99).contains(&p.probability));
    }

    let found = core.query_future("QUANTUM").await.unwrap();
    assert_eq!(
        found.scenario,
        "Breakthrough in quantum consciousness understanding"
    );
    assert!(core.query_future("nothing like this").await.is_none());

    assert_eq!(core.most_likely_future().await, core.most_likely_future().await);
}

#[tokio::test(start_paused = true)]
async fn snapshots_capture_scalar_state() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    core.stop_simulation().await;
    core.tick(CycleKind::Fast).await;

    let metrics = core.metrics().await;
    let first = core.create_snapshot().await;
    let second = core.create_snapshot().await;

    assert_eq!(first.quantum_states_estimate, metrics.quantum_states.floor() as u64);
    assert_eq!(first.goal, metrics.current_goal);
    assert_ne!(first.id, second.id);
    assert_eq!(core.snapshots().await, vec![first, second]);
}

#[tokio::test(start_paused = true)]
async fn tts_toggle_flips_flag() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    assert!(core.metrics().await.tts_enabled);
    assert!(!core.toggle_tts().await);
    assert!(core.toggle_tts().await);
}

#[tokio::test(start_paused = true)]
async fn sample_thought_draws_from_thought_log() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    let thought = core.sample_thought().await.unwrap();
    assert!(core.thoughts().await.contains(&thought));
}

#[tokio::test(start_paused = true)]
async fn quiet_event_table_suppresses_agent_dialogue() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(core.agent_log().await.is_empty());
    assert_eq!(core.current_goal().await, narrative::INITIAL_GOAL);
}

#[tokio::test(start_paused = true)]
async fn agent_log_is_newest_first_and_bounded() {
    let events = quiet_events().with_probability(RandomEvent::InternalDialogue, 1.0);
    let core = running_core_with(Arc::new(SyntheticCompletion::new()), events).await;
    core.stop_simulation().await;

    for _ in 0..24 {
        core.tick(CycleKind::Fast).await;
    }
    let before = core.agent_log().await;
    assert_eq!(before.len(), 20);

    core.tick(CycleKind::Fast).await;
    let after = core.agent_log().await;
    assert_eq!(after.len(), 20);
    // Everything shifts one place back behind the new entry.
    assert_eq!(&after[1..], &before[..19]);
    assert!(after[0].timestamp >= after[19].timestamp);
}

#[tokio::test(start_paused = true)]
async fn concurrent_toggles_flip_once_each() {
    let core = running_core(Arc::new(SyntheticCompletion::new())).await;
    core.stop_simulation().await;

    let (first, second) = tokio::join!(core.toggle(), core.toggle());

    assert_ne!(first, second);
    assert!(!core.is_running().await);
    assert!(!core.metrics().await.simulation_running);
}
