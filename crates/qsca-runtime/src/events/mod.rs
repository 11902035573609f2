//! Weighted random-event table.
//!
//! Every probabilistic branch of the cycles is a named [`RandomEvent`]
//! attached to the cycle that rolls it. Probabilities live in one table so
//! they can be configured, inspected and forced in tests with a seeded RNG.

use crate::config::EventConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cycle that owns a random event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleKind {
    /// Adjustable fast simulation cycle.
    Fast,
    /// Fixed long-period autonomous evolution cycle.
    Reflection,
    /// Temporal projection cycle.
    Temporal,
    /// Post-interaction update after a conversation turn.
    Interaction,
}

/// Named probabilistic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomEvent {
    /// Replace the current goal with one from the goal list.
    GoalRefinement,
    /// Emit an internal-agent log line.
    InternalDialogue,
    /// Append an autonomous reflection thought.
    AutonomousReflection,
    /// Append a temporal insight.
    TemporalInsight,
    /// Append a growth thought after an interaction.
    GrowthThought,
}

impl RandomEvent {
    pub const ALL: [RandomEvent; 5] = [
        RandomEvent::GoalRefinement,
        RandomEvent::InternalDialogue,
        RandomEvent::AutonomousReflection,
        RandomEvent::TemporalInsight,
        RandomEvent::GrowthThought,
    ];

    /// The cycle this event is rolled on.
    pub fn cycle(self) -> CycleKind {
        match self {
            RandomEvent::GoalRefinement | RandomEvent::InternalDialogue => CycleKind::Fast,
            RandomEvent::AutonomousReflection => CycleKind::Reflection,
            RandomEvent::TemporalInsight => CycleKind::Temporal,
            RandomEvent::GrowthThought => CycleKind::Interaction,
        }
    }
}

/// Probability table keyed by event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTable {
    probabilities: HashMap<RandomEvent, f64>,
}

impl EventTable {
    pub fn from_config(config: &EventConfig) -> Self {
        let mut probabilities = HashMap::new();
        probabilities.insert(RandomEvent::GoalRefinement, config.goal_refinement);
        probabilities.insert(RandomEvent::InternalDialogue, config.internal_dialogue);
        probabilities.insert(RandomEvent::AutonomousReflection, config.autonomous_reflection);
        probabilities.insert(RandomEvent::TemporalInsight, config.temporal_insight);
        probabilities.insert(RandomEvent::GrowthThought, config.growth_thought);
        Self { probabilities }
    }

    /// Override one probability (clamped to [0,1]).
    pub fn with_probability(mut self, event: RandomEvent, probability: f64) -> Self {
        self.set_probability(event, probability);
        self
    }

    pub fn set_probability(&mut self, event: RandomEvent, probability: f64) {
        self.probabilities
            .insert(event, probability.clamp(0.0, 1.0));
    }

    pub fn probability(&self, event: RandomEvent) -> f64 {
        self.probabilities.get(&event).copied().unwrap_or(0.0)
    }

    /// Events attached to `cycle`, in declaration order.
    pub fn events_for(&self, cycle: CycleKind) -> impl Iterator<Item = RandomEvent> {
        RandomEvent::ALL.into_iter().filter(move |e| e.cycle() == cycle)
    }

    /// Roll a single event. Consumes exactly one draw from `rng`.
    pub fn fires(&self, event: RandomEvent, rng: &mut impl Rng) -> bool {
        let p = self.probability(event);
        rng.gen::<f64>() < p
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::from_config(&EventConfig::default())
    }
}
