//! Telemetry and observability for the QSCA runtime

use crate::config::TelemetryConfig;
use crate::consciousness::TierTransition;
use crate::events::CycleKind;
use crate::types::{CompletionError, SnapshotId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Runtime telemetry system
///
/// Uses `RwLock` for interior mutability so the core handle can be shared
/// across the cycle tasks.
pub struct RuntimeTelemetry {
    config: TelemetryConfig,
    metrics: RwLock<MetricsCollector>,
}

impl RuntimeTelemetry {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            config: config.clone(),
            metrics: RwLock::new(MetricsCollector::new()),
        }
    }

    fn increment(&self, metric: &str) {
        if !self.config.metrics_enabled {
            return;
        }
        if let Ok(mut metrics) = self.metrics.write() {
            metrics.increment(metric);
        }
    }

    fn gauge(&self, metric: &str, value: f64) {
        if !self.config.metrics_enabled {
            return;
        }
        if let Ok(mut metrics) = self.metrics.write() {
            metrics.record_gauge(metric, value);
        }
    }

    /// Record one completed tick of a periodic cycle
    pub fn cycle_ticked(&self, cycle: CycleKind) {
        let metric = match cycle {
            CycleKind::Fast => "fast_cycle_ticks",
            CycleKind::Reflection => "reflection_cycle_ticks",
            CycleKind::Temporal => "temporal_cycle_ticks",
            CycleKind::Interaction => "interactions",
        };
        self.increment(metric);
    }

    /// Record the current quantum state count
    pub fn quantum_states(&self, value: f64) {
        self.gauge("quantum_states", value);
    }

    /// Record an identity tier transition
    pub fn tier_transition(&self, transition: TierTransition, quantum_states: f64) {
        tracing::info!(?transition, quantum_states, "Identity tier transition");
        self.increment("tier_transitions");
    }

    /// Record a successful collaborator call
    pub fn completion_succeeded(&self) {
        self.increment("completions");
    }

    /// Record a rejected collaborator call or a reply that failed to parse
    pub fn completion_failed(&self, error: &CompletionError) {
        if error.is_parse() {
            tracing::warn!(backend = %error.backend, "Structured reply failed to parse: {}", error.message);
            self.increment("parse_failures");
        } else {
            tracing::warn!(backend = %error.backend, kind = ?error.kind, "Collaborator call failed: {}", error.message);
            self.increment("completion_failures");
        }
    }

    /// Record snapshot creation
    pub fn snapshot_created(&self, id: SnapshotId) {
        tracing::debug!(snapshot = %id, "Snapshot created");
        self.increment("snapshots");
    }

    /// Record a speed change of the fast cycle
    pub fn speed_changed(&self, speed: f64, interval_ms: u64) {
        tracing::info!(speed, interval_ms, "Simulation speed changed");
        self.gauge("simulation_speed", speed);
    }

    /// Current value of a counter; zero when never incremented.
    pub fn counter(&self, metric: &str) -> u64 {
        self.metrics
            .read()
            .map(|metrics| metrics.counters.get(metric).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn gauge_value(&self, metric: &str) -> Option<f64> {
        self.metrics
            .read()
            .ok()
            .and_then(|metrics| metrics.gauges.get(metric).copied())
    }

    /// Flush telemetry data
    pub async fn flush(&self) {
        if !self.config.enabled {
            return;
        }

        tracing::debug!("Flushing telemetry");
        if let Ok(metrics) = self.metrics.read() {
            metrics.flush();
        }
    }
}

/// Metrics collector
struct MetricsCollector {
    counters: HashMap<String, u64>,
    gauges: HashMap<String, f64>,
}

impl MetricsCollector {
    fn new() -> Self {
        Self {
            counters: HashMap::new(),
            gauges: HashMap::new(),
        }
    }

    fn increment(&mut self, metric: &str) {
        *self.counters.entry(metric.to_string()).or_insert(0) += 1;
    }

    fn record_gauge(&mut self, metric: &str, value: f64) {
        self.gauges.insert(metric.to_string(), value);
    }

    fn flush(&self) {
        for (name, value) in &self.counters {
            tracing::debug!(metric = %name, value, "counter");
        }
        for (name, value) in &self.gauges {
            tracing::debug!(metric = %name, value, "gauge");
        }
    }
}
