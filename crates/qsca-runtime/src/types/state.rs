//! Enumerations describing the core's observable state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived summary of simulated activity intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CognitiveLoad {
    #[default]
    Low,
    High,
    Critical,
    /// Transient marker while a conversation turn is awaiting the collaborator.
    Processing,
}

impl CognitiveLoad {
    /// Window used by the fast cycle: `clamp((q mod 100000) / 1000, 0, 100)`.
    pub fn window(quantum_states: f64) -> f64 {
        ((quantum_states % 100_000.0) / 1_000.0).clamp(0.0, 100.0)
    }

    /// Load derived from the current quantum state count.
    pub fn from_quantum_states(quantum_states: f64) -> Self {
        let w = Self::window(quantum_states);
        if w > 80.0 {
            CognitiveLoad::Critical
        } else if w > 40.0 {
            CognitiveLoad::High
        } else {
            CognitiveLoad::Low
        }
    }
}

impl fmt::Display for CognitiveLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CognitiveLoad::Low => "Low",
            CognitiveLoad::High => "High",
            CognitiveLoad::Critical => "Critical",
            CognitiveLoad::Processing => "Processing...",
        };
        f.write_str(label)
    }
}

/// Lifecycle of a cognitive core.
///
/// `Running` is terminal; `reset` reinitializes in place without leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifecyclePhase {
    Uninitialized,
    Initializing,
    Running,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecyclePhase::Uninitialized => "uninitialized",
            LifecyclePhase::Initializing => "initializing",
            LifecyclePhase::Running => "running",
        };
        f.write_str(label)
    }
}

/// Last sentiment classification of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
    Curious,
    Challenging,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Curious => "CURIOUS",
            Sentiment::Challenging => "CHALLENGING",
        };
        f.write_str(label)
    }
}
