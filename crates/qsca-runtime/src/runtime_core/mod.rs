//! Cognitive core aggregate: state, cycles and lifecycle

mod runtime;
mod state;

pub use runtime::{CognitiveCore, CoreBuilder, CoreStatus};
pub(crate) use state::CoreState;
pub use state::{speed_to_interval, AgentMessage, CoreMetrics, Snapshot, MAX_LEARNING_RATE};
