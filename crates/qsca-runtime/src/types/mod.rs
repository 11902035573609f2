//! Core type definitions for the QSCA runtime

mod bounded;
mod errors;
mod ids;
mod state;

pub use bounded::*;
pub use ids::*;
pub use state::*;

pub use errors::{
    BootstrapError, CompletionError, CompletionErrorKind, ConfigError, FeatureError,
};
