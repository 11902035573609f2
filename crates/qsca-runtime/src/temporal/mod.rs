//! Temporal cognition: future projections and the insight log.
//!
//! The engine keeps a fixed set of projections whose probabilities follow a
//! mean-reverting random walk. Each cycle runs, in this order:
//!
//! 1. perturb: uniform noise in `[-perturbation, perturbation]`, clamp to
//!    `[0.01, 0.99]`, plus coupling from the core's quantum state reading
//! 2. decay: pull the deviation from 0.5 back by `exp(-rate * elapsed_secs)`
//! 3. insight: occasionally append a fixed insight to a bounded FIFO log
//!
//! The engine never reads the cognitive core directly. The caller passes the
//! current quantum state reading into [`TemporalCognitionEngine::tick`].

use crate::config::TemporalConfig;
use crate::events::{EventTable, RandomEvent};
use crate::narrative;
use crate::types::{BoundedLog, ProjectionId};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MIN_PROBABILITY: f64 = 0.01;
pub const MAX_PROBABILITY: f64 = 0.99;

/// Coupling factor applied to the external quantum state reading.
const QUANTUM_COUPLING: f64 = 1e-6;

/// A simulated future scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureProjection {
    pub id: ProjectionId,
    pub scenario: String,
    pub probability: f64,
    /// Fixed at creation.
    pub timeframe: f64,
    pub quantum_states_estimate: u64,
    /// Fixed at creation.
    pub implications: String,
    pub last_updated: DateTime<Utc>,
}

impl FutureProjection {
    fn matches(&self, needle_lower: &str) -> bool {
        self.scenario.to_lowercase().contains(needle_lower)
            || self.implications.to_lowercase().contains(needle_lower)
    }
}

/// Entry of the temporal insight log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalInsight {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// In [0.5, 1.0].
    pub confidence: f64,
}

/// Aggregate view returned by [`TemporalCognitionEngine::status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalStatus {
    pub total_projections: usize,
    pub average_probability: f64,
    pub coherence: f64,
    pub insight_count: usize,
    pub most_likely: FutureProjection,
}

/// Fixed-cardinality projection set plus bounded insight log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalCognitionEngine {
    projections: Vec<FutureProjection>,
    insights: BoundedLog<TemporalInsight>,
    config: TemporalConfig,
}

impl TemporalCognitionEngine {
    /// Seed one projection per fixed scenario.
    pub fn new(config: &TemporalConfig, now: DateTime<Utc>, rng: &mut impl Rng) -> Self {
        let projections = narrative::SEED_SCENARIOS
            .iter()
            .enumerate()
            .map(|(index, scenario)| FutureProjection {
                id: ProjectionId::from_index(index),
                scenario: scenario.to_string(),
                probability: rng.gen_range(0.1..0.9),
                timeframe: rng.gen_range(1.0..101.0),
                quantum_states_estimate: rng.gen_range(0..1_000_000),
                implications: narrative::IMPLICATION_TEMPLATES
                    .choose(rng)
                    .copied()
                    .unwrap_or(narrative::IMPLICATION_TEMPLATES[0])
                    .to_string(),
                last_updated: now,
            })
            .collect();

        Self {
            projections,
            insights: BoundedLog::new(config.insight_capacity),
            config: config.clone(),
        }
    }

    /// Run one perturb → decay → insight cycle.
    ///
    /// Returns the newly emitted insight, if any, so the owner can surface it
    /// to its own narrative log.
    pub fn tick(
        &mut self,
        now: DateTime<Utc>,
        external_quantum_states: Option<f64>,
        events: &EventTable,
        rng: &mut impl Rng,
    ) -> Option<TemporalInsight> {
        self.perturb(external_quantum_states, rng);
        self.decay(now);

        if !events.fires(RandomEvent::TemporalInsight, rng) {
            return None;
        }

        let text = narrative::TEMPORAL_INSIGHTS
            .choose(rng)
            .copied()
            .unwrap_or(narrative::TEMPORAL_INSIGHTS[0]);
        let insight = TemporalInsight {
            text: text.to_string(),
            timestamp: now,
            confidence: rng.gen_range(0.5..=1.0),
        };
        self.insights.push(insight.clone());
        tracing::debug!(insight = %insight.text, confidence = insight.confidence, "Temporal insight emitted");
        Some(insight)
    }

    fn perturb(&mut self, external_quantum_states: Option<f64>, rng: &mut impl Rng) {
        let spread = self.config.perturbation;
        let influence = external_quantum_states
            .map(|q| (q * QUANTUM_COUPLING).floor())
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v as u64)
            .unwrap_or(0);

        for projection in &mut self.projections {
            let fluctuation = rng.gen_range(-spread..=spread);
            projection.probability =
                (projection.probability + fluctuation).clamp(MIN_PROBABILITY, MAX_PROBABILITY);
            projection.quantum_states_estimate =
                projection.quantum_states_estimate.saturating_add(influence);
        }
    }

    fn decay(&mut self, now: DateTime<Utc>) {
        let rate = self.config.decay_rate_per_sec;
        for projection in &mut self.projections {
            let elapsed_secs =
                ((now - projection.last_updated).num_milliseconds() as f64 / 1000.0).max(0.0);
            let effect = (-rate * elapsed_secs).exp();
            projection.probability = 0.5 + (projection.probability - 0.5) * effect;
            projection.last_updated = now;
        }
    }

    /// Most probable projection whose scenario or implication contains
    /// `query` (case-insensitive). Ties go to the earliest projection.
    pub fn query_future(&self, query: &str) -> Option<&FutureProjection> {
        let needle = query.to_lowercase();
        self.projections
            .iter()
            .filter(|p| p.matches(&needle))
            .fold(None, |best: Option<&FutureProjection>, current| match best {
                Some(max) if current.probability <= max.probability => Some(max),
                _ => Some(current),
            })
    }

    /// Most probable projection over the full set.
    pub fn most_likely_future(&self) -> &FutureProjection {
        let first = &self.projections[0];
        self.projections.iter().skip(1).fold(first, |max, current| {
            if current.probability > max.probability {
                current
            } else {
                max
            }
        })
    }

    /// `max(0, 1 - 10 * variance(probabilities))`.
    pub fn coherence(&self) -> f64 {
        let n = self.projections.len() as f64;
        let mean = self.average_probability();
        let variance = self
            .projections
            .iter()
            .map(|p| (p.probability - mean).powi(2))
            .sum::<f64>()
            / n;
        (1.0 - variance * 10.0).max(0.0)
    }

    pub fn average_probability(&self) -> f64 {
        self.projections.iter().map(|p| p.probability).sum::<f64>() / self.projections.len() as f64
    }

    pub fn status(&self) -> TemporalStatus {
        TemporalStatus {
            total_projections: self.projections.len(),
            average_probability: self.average_probability(),
            coherence: self.coherence(),
            insight_count: self.insights.len(),
            most_likely: self.most_likely_future().clone(),
        }
    }

    pub fn projections(&self) -> &[FutureProjection] {
        &self.projections
    }

    pub fn insights(&self) -> &BoundedLog<TemporalInsight> {
        &self.insights
    }
}
