//! Error types for the QSCA runtime

use crate::cognition::CompletionBackend;
use thiserror::Error;

/// Core bootstrap errors
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failure category of a collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    /// Backend is missing endpoint or credentials.
    NotConfigured,
    /// Network-level failure or rejected call.
    Transport,
    /// Non-success HTTP status.
    Status,
    /// Reply did not match the expected structured schema.
    Parse,
}

/// Error returned by completion, image and speech collaborators.
#[derive(Debug, Clone, Error)]
#[error("{backend} {kind:?} error: {message}")]
pub struct CompletionError {
    pub backend: CompletionBackend,
    pub kind: CompletionErrorKind,
    pub message: String,
}

impl CompletionError {
    pub fn new(
        backend: CompletionBackend,
        kind: CompletionErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            kind,
            message: message.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        self.kind == CompletionErrorKind::Parse
    }
}

/// Errors surfaced by feature operations that propagate instead of
/// answering with in-band failure text.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Failed to formulate image synthesis prompt.")]
    PromptGeneration(#[source] CompletionError),

    #[error("Image synthesis failed: {0}")]
    ImageSynthesis(#[source] CompletionError),
}
