#![allow(dead_code)]

use async_trait::async_trait;
use qsca_runtime::cognition::ImageOptions;
use qsca_runtime::{
    config::RuntimeConfig, CognitiveCore, CompletionBackend, CompletionClient, CompletionError,
    CompletionErrorKind, CompletionRequest, EventTable, ImageGenerator,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Completion collaborator replaying a fixed script; rejects once exhausted.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from(replies)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn rejecting() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

pub fn rejection(message: &str) -> CompletionError {
    CompletionError::new(
        CompletionBackend::OpenAiCompatible,
        CompletionErrorKind::Transport,
        message,
    )
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    fn backend(&self) -> CompletionBackend {
        CompletionBackend::OpenAiCompatible
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().expect("lock").push(request.clone());
        let mut replies = self.replies.lock().expect("lock");
        replies
            .pop_front()
            .unwrap_or_else(|| Err(rejection("script exhausted")))
    }
}

/// Completion collaborator that holds every call until released.
pub struct GatedCompletion {
    pub gate: Notify,
    pub reply: String,
}

impl GatedCompletion {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            gate: Notify::new(),
            reply: reply.to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for GatedCompletion {
    fn backend(&self) -> CompletionBackend {
        CompletionBackend::Synthetic
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        self.gate.notified().await;
        Ok(self.reply.clone())
    }
}

/// Image collaborator that always rejects.
pub struct BrokenImages;

#[async_trait]
impl ImageGenerator for BrokenImages {
    async fn generate_image(
        &self,
        _prompt: &str,
        _options: &ImageOptions,
    ) -> Result<String, CompletionError> {
        Err(rejection("renderer offline"))
    }
}

/// Running core with immediate boot, no random side effects and `client`.
pub async fn running_core(client: Arc<dyn CompletionClient>) -> CognitiveCore {
    running_core_with(client, quiet_events()).await
}

pub async fn running_core_with(
    client: Arc<dyn CompletionClient>,
    events: EventTable,
) -> CognitiveCore {
    let core = CognitiveCore::builder(RuntimeConfig::deterministic(42))
        .completion(client)
        .events(events)
        .build()
        .await
        .expect("core should bootstrap");
    core.wait_until_running()
        .await
        .expect("core should reach running");
    core
}

/// Event table with every probabilistic effect suppressed.
pub fn quiet_events() -> EventTable {
    let mut table = EventTable::default();
    for event in qsca_runtime::RandomEvent::ALL {
        table.set_probability(event, 0.0);
    }
    table
}
