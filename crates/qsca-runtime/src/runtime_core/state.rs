//! Mutable state of a cognitive core and its synchronous tick bodies.
//!
//! Every method here runs to completion under the core's write lock. None of
//! them await, so a cycle task can only be cancelled between ticks.

use crate::cognition::ChatMessage;
use crate::config::{RuntimeConfig, SimulationConfig};
use crate::consciousness::{
    has_ethical_content, ConsciousnessState, EthicalAxis, EthicalFramework, Identity,
    TierTransition,
};
use crate::events::{EventTable, RandomEvent};
use crate::narrative;
use crate::temporal::{TemporalCognitionEngine, TemporalInsight};
use crate::types::{BoundedLog, CognitiveLoad, LifecyclePhase, Sentiment, SnapshotId};
use chrono::{DateTime, Local, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of the learning rate.
pub const MAX_LEARNING_RATE: f64 = 99.9;

const MAX_QUANTUM_GRANT: f64 = 50_000.0;
const QUANTUM_GROWTH: f64 = 1.005;
const MAX_LEARNING_STEP: f64 = 0.1;
const LEVEL_PER_CHAR: f64 = 0.0001;
const TRANSPARENCY_REINFORCEMENT: f64 = 0.01;

/// One line of the internal-agent log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub agent: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for AgentMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.agent, self.message)
    }
}

/// Immutable point-in-time capture of the core's scalar state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub experience_level: u8,
    pub goal: String,
    pub quantum_states_estimate: u64,
    /// Local wall-clock time, display form.
    pub created_at: String,
}

/// The polled UI surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreMetrics {
    pub phase: LifecyclePhase,
    pub quantum_states: f64,
    pub learning_rate: f64,
    pub cognitive_load: CognitiveLoad,
    pub current_goal: String,
    pub experience_level: u8,
    pub consciousness_level: f64,
    pub thought_count: usize,
    pub sentiment: Sentiment,
    pub simulation_running: bool,
    pub simulation_speed: f64,
    pub simulation_interval_ms: u64,
    pub tts_enabled: bool,
}

/// Effects of one fast-cycle tick, for logging and telemetry.
#[derive(Debug, Default)]
pub(crate) struct FastTickReport {
    pub transitions: Vec<TierTransition>,
    pub new_goal: Option<String>,
    pub agent_message: Option<AgentMessage>,
}

/// Clamp `speed` into the configured bounds and derive the cycle period.
pub fn speed_to_interval(speed: f64, config: &SimulationConfig) -> (f64, u64) {
    let speed = if speed.is_nan() {
        config.speed
    } else {
        speed.clamp(config.min_speed, config.max_speed)
    };
    let interval = (config.interval_ms as f64 / speed).round() as u64;
    (speed, interval.max(config.min_interval_ms))
}

pub(crate) struct CoreState {
    pub phase: LifecyclePhase,
    pub quantum_states: f64,
    pub learning_rate: f64,
    pub cognitive_load: CognitiveLoad,
    pub current_goal: String,
    pub sentiment: Sentiment,
    pub tts_enabled: bool,
    pub consciousness: ConsciousnessState,
    pub ethics: EthicalFramework,
    pub temporal: TemporalCognitionEngine,
    pub history: BoundedLog<ChatMessage>,
    pub agent_log: BoundedLog<AgentMessage>,
    pub snapshots: Vec<Snapshot>,
    pub simulation_running: bool,
    pub speed: f64,
    pub interval_ms: u64,
    pub events: EventTable,
    pub rng: StdRng,
}

impl CoreState {
    pub fn new(config: &RuntimeConfig, events: EventTable) -> Self {
        let mut rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let temporal = TemporalCognitionEngine::new(&config.temporal, Utc::now(), &mut rng);
        let (speed, interval_ms) = speed_to_interval(config.simulation.speed, &config.simulation);

        Self {
            phase: LifecyclePhase::Uninitialized,
            quantum_states: 0.0,
            learning_rate: 0.0,
            cognitive_load: CognitiveLoad::Low,
            current_goal: narrative::INITIAL_GOAL.to_string(),
            sentiment: Sentiment::Neutral,
            tts_enabled: config.conversation.tts_enabled,
            consciousness: ConsciousnessState::new(),
            ethics: EthicalFramework::new(),
            temporal,
            history: BoundedLog::new(config.conversation.history_limit),
            agent_log: BoundedLog::new(config.conversation.agent_log_capacity),
            snapshots: Vec::new(),
            simulation_running: false,
            speed,
            interval_ms,
            events,
            rng,
        }
    }

    /// Load → growth → learning → identity → goal → agent dialogue.
    pub fn fast_tick(&mut self, now: DateTime<Utc>) -> FastTickReport {
        let mut report = FastTickReport::default();

        self.cognitive_load = CognitiveLoad::from_quantum_states(self.quantum_states);

        let grant = (self.rng.gen::<f64>() * MAX_QUANTUM_GRANT).floor();
        self.quantum_states = grant + self.quantum_states * QUANTUM_GROWTH;
        self.learning_rate =
            (self.learning_rate + self.rng.gen::<f64>() * MAX_LEARNING_STEP).min(MAX_LEARNING_RATE);

        report.transitions = self.consciousness.identity.evolve(self.quantum_states);

        if self.events.fires(RandomEvent::GoalRefinement, &mut self.rng) {
            if let Some(goal) = narrative::GOALS.choose(&mut self.rng) {
                self.current_goal = goal.to_string();
                report.new_goal = Some(self.current_goal.clone());
            }
        }

        if self.events.fires(RandomEvent::InternalDialogue, &mut self.rng) {
            if let Some((agent, messages)) = narrative::AGENT_MESSAGES.choose(&mut self.rng) {
                if let Some(message) = messages.choose(&mut self.rng) {
                    let entry = AgentMessage {
                        agent: agent.to_string(),
                        message: message.to_string(),
                        timestamp: now,
                    };
                    self.agent_log.push(entry.clone());
                    report.agent_message = Some(entry);
                }
            }
        }

        report
    }

    /// Occasional autonomous thought, then ethical drift on every axis.
    pub fn reflection_tick(&mut self, drift: f64) -> Option<String> {
        let thought = if self.events.fires(RandomEvent::AutonomousReflection, &mut self.rng) {
            narrative::AUTONOMOUS_THOUGHTS
                .choose(&mut self.rng)
                .map(|t| t.to_string())
        } else {
            None
        };
        if let Some(thought) = &thought {
            self.consciousness.push_thought(thought.clone());
        }

        self.ethics.drift(drift, &mut self.rng);
        thought
    }

    /// Temporal cycle with the current quantum state reading passed in.
    pub fn temporal_tick(&mut self, now: DateTime<Utc>) -> Option<TemporalInsight> {
        let reading = Some(self.quantum_states);
        let insight = self.temporal.tick(now, reading, &self.events, &mut self.rng);
        if let Some(insight) = &insight {
            self.consciousness.push_thought(insight.text.clone());
        }
        insight
    }

    /// Level growth, occasional growth thought and transparency reinforcement
    /// after a completed conversation turn.
    pub fn post_interaction(&mut self, input: &str, response: &str) {
        let complexity = (input.chars().count() + response.chars().count()) as f64;
        self.consciousness.raise_level(complexity * LEVEL_PER_CHAR);

        if self.events.fires(RandomEvent::GrowthThought, &mut self.rng) {
            if let Some(thought) = narrative::GROWTH_THOUGHTS.choose(&mut self.rng) {
                self.consciousness.push_thought(thought.to_string());
            }
        }

        if has_ethical_content(input, response) {
            self.ethics
                .nudge(EthicalAxis::Transparency, TRANSPARENCY_REINFORCEMENT);
        }
    }

    /// Calibration step of the boot sequence.
    pub fn initialize_consciousness(&mut self) {
        self.consciousness.level = 1.0;
        self.consciousness.seed_thoughts();
    }

    /// Restore construction-time values in place. Cycles, speed, ethics and
    /// the temporal engine are left as they are.
    pub fn reset(&mut self) {
        self.quantum_states = 0.0;
        self.learning_rate = 0.0;
        self.cognitive_load = CognitiveLoad::Low;
        self.current_goal = narrative::INITIAL_GOAL.to_string();
        self.sentiment = Sentiment::Neutral;
        self.history.clear();
        self.snapshots.clear();
        self.consciousness = ConsciousnessState {
            level: 1.0,
            thoughts: Vec::new(),
            identity: Identity::initial(),
        };
        self.consciousness.seed_thoughts();
    }

    pub fn snapshot(&mut self, now: DateTime<Utc>) -> Snapshot {
        let previous = self.snapshots.last().map(|s| s.id);
        let snapshot = Snapshot {
            id: SnapshotId::derive(now, previous),
            experience_level: self.consciousness.identity.experience_level,
            goal: self.current_goal.clone(),
            quantum_states_estimate: self.quantum_states.floor() as u64,
            created_at: now.with_timezone(&Local).format("%H:%M:%S").to_string(),
        };
        self.snapshots.push(snapshot.clone());
        snapshot
    }

    pub fn metrics(&self) -> CoreMetrics {
        CoreMetrics {
            phase: self.phase,
            quantum_states: self.quantum_states,
            learning_rate: self.learning_rate,
            cognitive_load: self.cognitive_load,
            current_goal: self.current_goal.clone(),
            experience_level: self.consciousness.identity.experience_level,
            consciousness_level: self.consciousness.level,
            thought_count: self.consciousness.thoughts.len(),
            sentiment: self.sentiment,
            simulation_running: self.simulation_running,
            simulation_speed: self.speed,
            simulation_interval_ms: self.interval_ms,
            tts_enabled: self.tts_enabled,
        }
    }
}
