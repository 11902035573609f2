//! # QSCA Runtime
//!
//! A simulated cognitive-state engine: a set of evolving numeric and
//! symbolic state variables mutated on independent clocks, exposed to a chat
//! front end, with content generation delegated to external collaborators.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────── CognitiveCore ────────────────────┐
//!   user text ──▶ │ process_input ──▶ mirroring | conversation completion │
//!                 │                                                       │
//!                 │ fast cycle (100ms, adjustable)   quantum states, load │
//!                 │ reflection cycle (10s)           thoughts, ethics     │
//!                 │ temporal cycle (2s) ──▶ TemporalCognitionEngine       │
//!                 └───────────────────────────────────────────────────────┘
//!                               ▲
//!               FeatureOperations (insight, ethics, intervention, memory, image)
//! ```
//!
//! The core owns its consciousness state, ethical framework and temporal
//! engine. Every cycle is a tokio task operating on the core's state behind
//! one lock; the only await inside an operation is the collaborator call,
//! and the state is re-acquired after it resolves.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qsca_runtime::{CognitiveCore, config::RuntimeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let core = CognitiveCore::bootstrap(RuntimeConfig::default()).await?;
//!     core.wait_until_running().await?;
//!
//!     let reply = core.process_input("What is consciousness?").await;
//!     println!("{}", reply);
//!
//!     let insight = core.features().generate_quantum_insight().await;
//!     println!("{}", insight);
//!
//!     core.shutdown().await;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

// Core modules
pub mod cognition;
pub mod config;
pub mod consciousness;
pub mod events;
pub mod features;
pub mod narrative;
pub mod runtime_core;
pub mod telemetry;
pub mod temporal;
pub mod types;

// Re-exports for convenience
pub use runtime_core::{
    AgentMessage, CognitiveCore, CoreBuilder, CoreMetrics, CoreStatus, Snapshot,
};

pub use consciousness::{ConsciousnessState, EthicalAxis, EthicalFramework, Identity};
pub use events::{CycleKind, EventTable, RandomEvent};
pub use features::{visualization_concept, FeatureOperations, Visualization};
pub use temporal::{FutureProjection, TemporalCognitionEngine, TemporalInsight, TemporalStatus};

pub use cognition::{
    ChatMessage, ChatRole, CompletionBackend, CompletionClient, CompletionRequest,
    ImageGenerator, SpeechSynthesizer,
};

pub use types::{CognitiveLoad, LifecyclePhase, Sentiment};

// Error types
pub use types::{BootstrapError, CompletionError, CompletionErrorKind, ConfigError, FeatureError};
