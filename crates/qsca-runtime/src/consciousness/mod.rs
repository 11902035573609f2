//! Consciousness state, identity record and ethical framework.
//!
//! These are plain data holders owned exclusively by the cognitive core.
//! Their invariants are enforced by the mutation methods here:
//!
//! - identity `experience_level` only moves up, through tiers 0 → 1 → 2
//! - consciousness `level` only grows
//! - every ethical axis stays in [0,1] after every mutation

use crate::narrative;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum-state threshold for the tier-1 identity transition.
pub const TIER_ONE_THRESHOLD: f64 = 500_000.0;
/// Quantum-state threshold for the tier-2 identity transition.
pub const TIER_TWO_THRESHOLD: f64 = 2_000_000.0;

/// Self-description of the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub purpose: String,
    /// Ordered; duplicates allowed on append.
    pub values: Vec<String>,
    pub experience_level: u8,
    pub last_evolution: DateTime<Utc>,
}

/// Identity tier change produced by [`Identity::evolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierTransition {
    ToOne,
    ToTwo,
}

impl Identity {
    pub fn initial() -> Self {
        Self {
            name: narrative::IDENTITY_NAME.to_string(),
            purpose: narrative::INITIAL_PURPOSE.to_string(),
            values: narrative::INITIAL_VALUES
                .iter()
                .map(|v| v.to_string())
                .collect(),
            experience_level: 0,
            last_evolution: Utc::now(),
        }
    }

    /// Apply the one-time tier transitions for the current quantum state count.
    ///
    /// Tier 2 requires tier 1 to have been reached, which it always has by the
    /// time the tier-2 check runs since the thresholds are ordered.
    pub fn evolve(&mut self, quantum_states: f64) -> Vec<TierTransition> {
        let mut transitions = Vec::new();

        if quantum_states > TIER_ONE_THRESHOLD && self.experience_level < 1 {
            self.experience_level = 1;
            self.purpose = narrative::TIER_ONE_PURPOSE.to_string();
            self.last_evolution = Utc::now();
            transitions.push(TierTransition::ToOne);
        }

        if quantum_states > TIER_TWO_THRESHOLD && self.experience_level == 1 {
            self.experience_level = 2;
            self.values.push(narrative::TIER_TWO_VALUE.to_string());
            self.last_evolution = Utc::now();
            transitions.push(TierTransition::ToTwo);
        }

        transitions
    }
}

/// Level scalar, thought log and identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsciousnessState {
    pub level: f64,
    /// Oldest-first, append-only.
    pub thoughts: Vec<String>,
    pub identity: Identity,
}

impl ConsciousnessState {
    pub fn new() -> Self {
        Self {
            level: 0.0,
            thoughts: Vec::new(),
            identity: Identity::initial(),
        }
    }

    /// Replace the thought log with the fixed seed thoughts.
    pub fn seed_thoughts(&mut self) {
        self.thoughts = narrative::SEED_THOUGHTS
            .iter()
            .map(|t| t.to_string())
            .collect();
    }

    pub fn push_thought(&mut self, thought: impl Into<String>) {
        self.thoughts.push(thought.into());
    }

    /// Grow the level; negative deltas are ignored.
    pub fn raise_level(&mut self, delta: f64) {
        if delta > 0.0 {
            self.level += delta;
        }
    }

    /// The last `n` thoughts, oldest-first.
    pub fn recent_thoughts(&self, n: usize) -> &[String] {
        &self.thoughts[self.thoughts.len().saturating_sub(n)..]
    }
}

impl Default for ConsciousnessState {
    fn default() -> Self {
        Self::new()
    }
}

/// The five fixed value axes of the ethical framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EthicalAxis {
    Beneficence,
    NonMaleficence,
    Autonomy,
    Justice,
    Transparency,
}

impl EthicalAxis {
    pub const ALL: [EthicalAxis; 5] = [
        EthicalAxis::Beneficence,
        EthicalAxis::NonMaleficence,
        EthicalAxis::Autonomy,
        EthicalAxis::Justice,
        EthicalAxis::Transparency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EthicalAxis::Beneficence => "beneficence",
            EthicalAxis::NonMaleficence => "nonMaleficence",
            EthicalAxis::Autonomy => "autonomy",
            EthicalAxis::Justice => "justice",
            EthicalAxis::Transparency => "transparency",
        }
    }

    fn index(self) -> usize {
        match self {
            EthicalAxis::Beneficence => 0,
            EthicalAxis::NonMaleficence => 1,
            EthicalAxis::Autonomy => 2,
            EthicalAxis::Justice => 3,
            EthicalAxis::Transparency => 4,
        }
    }
}

impl fmt::Display for EthicalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named value weights in [0,1] plus violation/reinforcement logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicalFramework {
    core_values: [f64; 5],
    /// Storage only; no core logic reads these.
    pub violations: Vec<String>,
    pub reinforcements: Vec<String>,
}

impl EthicalFramework {
    pub fn new() -> Self {
        Self {
            core_values: [1.0, 1.0, 0.8, 0.9, 0.7],
            violations: Vec::new(),
            reinforcements: Vec::new(),
        }
    }

    pub fn value(&self, axis: EthicalAxis) -> f64 {
        self.core_values[axis.index()]
    }

    /// Add `delta` to one axis and clamp to [0,1].
    pub fn nudge(&mut self, axis: EthicalAxis, delta: f64) -> f64 {
        let slot = &mut self.core_values[axis.index()];
        *slot = (*slot + delta).clamp(0.0, 1.0);
        *slot
    }

    /// Signed random walk on every axis, magnitude at most `magnitude`.
    pub fn drift(&mut self, magnitude: f64, rng: &mut impl Rng) {
        for axis in EthicalAxis::ALL {
            let drift = (rng.gen::<f64>() - 0.5) * 2.0 * magnitude;
            self.nudge(axis, drift);
        }
    }

    /// `(axis, value)` pairs in fixed axis order.
    pub fn core_values(&self) -> Vec<(EthicalAxis, f64)> {
        EthicalAxis::ALL
            .iter()
            .map(|axis| (*axis, self.value(*axis)))
            .collect()
    }

    /// JSON object keyed by axis name, used when embedding values in prompts.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .core_values()
            .into_iter()
            .map(|(axis, value)| (axis.name().to_string(), serde_json::json!(value)))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Default for EthicalFramework {
    fn default() -> Self {
        Self::new()
    }
}

/// True if either text mentions an ethics keyword (case-insensitive).
pub fn has_ethical_content(input: &str, response: &str) -> bool {
    let input = input.to_lowercase();
    let response = response.to_lowercase();
    narrative::ETHICAL_KEYWORDS
        .iter()
        .any(|keyword| input.contains(keyword) || response.contains(keyword))
}
