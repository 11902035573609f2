//! Configuration for the QSCA runtime

use crate::cognition::CompletionBackend;
use crate::types::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound of the per-tick projection perturbation.
pub const MAX_PERTURBATION: f64 = 1.0;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub boot: BootConfig,
    #[serde(default)]
    pub temporal: TemporalConfig,
    #[serde(default)]
    pub events: EventConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    /// Load configuration: defaults, then an optional file, then `QSCA_`
    /// environment variables (`__` separates nested keys, e.g.
    /// `QSCA_SIMULATION__SEED=7`).
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&RuntimeConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("QSCA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: RuntimeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the cycles cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.interval_ms == 0 || sim.min_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "simulation intervals must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("simulation.speed", sim.speed),
            ("simulation.min_speed", sim.min_speed),
            ("simulation.max_speed", sim.max_speed),
            ("simulation.speed_step", sim.speed_step),
            ("simulation.ethical_drift", sim.ethical_drift),
            ("temporal.decay_rate_per_sec", self.temporal.decay_rate_per_sec),
            ("temporal.perturbation", self.temporal.perturbation),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "`{}` must be finite, got {}",
                    name, value
                )));
            }
        }
        if !(sim.min_speed > 0.0 && sim.min_speed <= sim.max_speed) {
            return Err(ConfigError::Invalid(format!(
                "simulation speed bounds are inconsistent: [{}, {}]",
                sim.min_speed, sim.max_speed
            )));
        }
        if !(0.0..=1.0).contains(&sim.ethical_drift) {
            return Err(ConfigError::Invalid(format!(
                "ethical drift must be in [0,1], got {}",
                sim.ethical_drift
            )));
        }
        if sim.reflection_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "reflection interval must be positive".to_string(),
            ));
        }
        if self.temporal.cycle_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "temporal cycle interval must be positive".to_string(),
            ));
        }
        if self.temporal.decay_rate_per_sec < 0.0 {
            return Err(ConfigError::Invalid(
                "temporal decay must be non-negative".to_string(),
            ));
        }
        if !(0.0..=MAX_PERTURBATION).contains(&self.temporal.perturbation) {
            return Err(ConfigError::Invalid(format!(
                "temporal perturbation must be in [0,{}], got {}",
                MAX_PERTURBATION, self.temporal.perturbation
            )));
        }
        for (name, p) in self.events.entries() {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!(
                    "event probability `{}` must be in [0,1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }

    /// Configuration for deterministic tests: seeded RNG, no boot delays.
    pub fn deterministic(seed: u64) -> Self {
        let mut config = Self::default();
        config.simulation.seed = Some(seed);
        config.boot = BootConfig::immediate();
        config.conversation.analyze_sentiment = false;
        config
    }
}

/// Fast simulation cycle and speed control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Period of the fast cycle at speed 1.0.
    pub interval_ms: u64,
    pub speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub min_interval_ms: u64,
    /// Step used by the faster/slower shortcuts.
    pub speed_step: f64,
    /// Period of the autonomous evolution cycle.
    pub reflection_interval_secs: u64,
    /// Magnitude of the ethical drift per reflection tick.
    pub ethical_drift: f64,
    /// Seed for the simulation RNG; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            speed: 1.0,
            min_speed: 0.25,
            max_speed: 4.0,
            min_interval_ms: 25,
            speed_step: 0.25,
            reflection_interval_secs: 10,
            ethical_drift: 0.0005,
            seed: None,
        }
    }
}

/// Delays between the initialization announcements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootConfig {
    pub announce_delay_ms: u64,
    pub pathways_delay_ms: u64,
    pub calibration_delay_ms: u64,
}

impl BootConfig {
    pub fn immediate() -> Self {
        Self {
            announce_delay_ms: 0,
            pathways_delay_ms: 0,
            calibration_delay_ms: 0,
        }
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            announce_delay_ms: 1000,
            pathways_delay_ms: 1500,
            calibration_delay_ms: 1000,
        }
    }
}

/// Temporal projection engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalConfig {
    pub cycle_interval_ms: u64,
    pub insight_capacity: usize,
    pub decay_rate_per_sec: f64,
    pub perturbation: f64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 2000,
            insight_capacity: 20,
            decay_rate_per_sec: 0.001,
            perturbation: 0.025,
        }
    }
}

/// Probabilities of the weighted random-event table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub goal_refinement: f64,
    pub internal_dialogue: f64,
    pub autonomous_reflection: f64,
    pub temporal_insight: f64,
    pub growth_thought: f64,
}

impl EventConfig {
    fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("goal_refinement", self.goal_refinement),
            ("internal_dialogue", self.internal_dialogue),
            ("autonomous_reflection", self.autonomous_reflection),
            ("temporal_insight", self.temporal_insight),
            ("growth_thought", self.growth_thought),
        ]
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            goal_refinement: 0.005,
            internal_dialogue: 0.02,
            autonomous_reflection: 0.2,
            temporal_insight: 0.1,
            growth_thought: 0.3,
        }
    }
}

/// Conversation and log sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    pub history_limit: usize,
    /// Turns handed to identity mirroring.
    pub mirroring_window: usize,
    /// Recent thoughts included in a memory query.
    pub memory_excerpt: usize,
    pub agent_log_capacity: usize,
    pub analyze_sentiment: bool,
    pub tts_enabled: bool,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_limit: 10,
            mirroring_window: 5,
            memory_excerpt: 5,
            agent_log_capacity: 20,
            analyze_sentiment: true,
            tts_enabled: true,
        }
    }
}

/// External completion, image and speech collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub backend: CompletionBackend,
    pub endpoint: Option<String>,
    pub image_endpoint: Option<String>,
    pub model: String,
    pub image_model: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub voice: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            backend: CompletionBackend::Synthetic,
            endpoint: None,
            image_endpoint: None,
            model: "gpt-4o-mini".to_string(),
            image_model: "dall-e-3".to_string(),
            api_key: None,
            request_timeout_secs: 60,
            voice: "en-male".to_string(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            metrics_enabled: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
