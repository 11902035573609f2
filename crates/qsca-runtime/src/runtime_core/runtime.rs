//! The cognitive core aggregate and its periodic cycles

use super::state::{speed_to_interval, AgentMessage, CoreMetrics, CoreState, Snapshot};
use crate::cognition::{
    ChatMessage, CompletionBackend, CompletionClient, CompletionPurpose, CompletionRequest,
    ImageGenerator, OpenAiCompatibleClient, SpeechSynthesizer, SyntheticCompletion,
    SyntheticImageGenerator, SyntheticSpeech,
};
use crate::config::RuntimeConfig;
use crate::consciousness::{EthicalFramework, Identity};
use crate::events::{CycleKind, EventTable};
use crate::features::{prompts, FeatureOperations};
use crate::narrative;
use crate::telemetry::RuntimeTelemetry;
use crate::temporal::{FutureProjection, TemporalInsight, TemporalStatus};
use crate::types::{
    BootstrapError, CognitiveLoad, CompletionError, CoreId, LifecyclePhase, Sentiment,
};
use chrono::Utc;
use rand::seq::SliceRandom;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};

/// Lifecycle phase plus the latest status announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStatus {
    pub phase: LifecyclePhase,
    pub message: String,
}

/// Handle to a running cognitive core.
///
/// Cloning is cheap; every clone drives the same state. The periodic cycles
/// hold only a weak reference and stop once the last handle is dropped.
#[derive(Clone)]
pub struct CognitiveCore {
    inner: Arc<CoreInner>,
}

struct CoreInner {
    id: CoreId,
    config: RuntimeConfig,
    state: RwLock<CoreState>,
    completion: Arc<dyn CompletionClient>,
    images: Arc<dyn ImageGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    telemetry: Arc<RuntimeTelemetry>,
    status_tx: watch::Sender<CoreStatus>,
    tasks: Mutex<CycleTasks>,
}

#[derive(Default)]
struct CycleTasks {
    boot: Option<JoinHandle<()>>,
    fast: Option<JoinHandle<()>>,
    reflection: Option<JoinHandle<()>>,
    temporal: Option<JoinHandle<()>>,
}

impl CycleTasks {
    fn abort_all(&mut self) {
        for handle in [
            self.boot.take(),
            self.fast.take(),
            self.reflection.take(),
            self.temporal.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}

/// Builder for a core with explicit collaborators.
pub struct CoreBuilder {
    config: RuntimeConfig,
    events: Option<EventTable>,
    completion: Option<Arc<dyn CompletionClient>>,
    images: Option<Arc<dyn ImageGenerator>>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
}

impl CoreBuilder {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            events: None,
            completion: None,
            images: None,
            speech: None,
        }
    }

    /// Replace the event table derived from `config.events`.
    pub fn events(mut self, events: EventTable) -> Self {
        self.events = Some(events);
        self
    }

    pub fn completion(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion = Some(client);
        self
    }

    pub fn images(mut self, generator: Arc<dyn ImageGenerator>) -> Self {
        self.images = Some(generator);
        self
    }

    pub fn speech(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(synthesizer);
        self
    }

    /// Validate the configuration, start the temporal cycle and launch the
    /// boot sequence. Must be called inside a tokio runtime.
    pub async fn build(self) -> Result<CognitiveCore, BootstrapError> {
        self.config
            .validate()
            .map_err(|e| BootstrapError::ConfigError(e.to_string()))?;

        let (completion, images) = match (self.completion, self.images) {
            (Some(completion), Some(images)) => (completion, images),
            (completion, images) => {
                let (default_completion, default_images) = default_collaborators(&self.config)?;
                (
                    completion.unwrap_or(default_completion),
                    images.unwrap_or(default_images),
                )
            }
        };
        let speech = self
            .speech
            .unwrap_or_else(|| Arc::new(SyntheticSpeech) as Arc<dyn SpeechSynthesizer>);
        let events = self
            .events
            .unwrap_or_else(|| EventTable::from_config(&self.config.events));

        let id = CoreId::generate();
        tracing::info!(core = %id, backend = %completion.backend(), "Bootstrapping cognitive core");

        let state = CoreState::new(&self.config, events);
        let (status_tx, _) = watch::channel(CoreStatus {
            phase: LifecyclePhase::Uninitialized,
            message: String::new(),
        });

        let core = CognitiveCore {
            inner: Arc::new(CoreInner {
                id,
                telemetry: Arc::new(RuntimeTelemetry::new(&self.config.telemetry)),
                config: self.config,
                state: RwLock::new(state),
                completion,
                images,
                speech,
                status_tx,
                tasks: Mutex::new(CycleTasks::default()),
            }),
        };

        {
            let mut tasks = core.inner.tasks.lock().await;
            let temporal_period =
                Duration::from_millis(core.inner.config.temporal.cycle_interval_ms);
            tasks.temporal = Some(core.spawn_cycle(CycleKind::Temporal, temporal_period));
            tasks.boot = Some(tokio::spawn(boot_sequence(Arc::downgrade(&core.inner))));
        }

        Ok(core)
    }
}

fn default_collaborators(
    config: &RuntimeConfig,
) -> Result<(Arc<dyn CompletionClient>, Arc<dyn ImageGenerator>), BootstrapError> {
    match config.completion.backend {
        CompletionBackend::Synthetic => {
            let completion: Arc<dyn CompletionClient> = Arc::new(SyntheticCompletion::new());
            let images: Arc<dyn ImageGenerator> = Arc::new(SyntheticImageGenerator);
            Ok((completion, images))
        }
        CompletionBackend::OpenAiCompatible => {
            let client = Arc::new(
                OpenAiCompatibleClient::from_config(&config.completion)
                    .map_err(|e| BootstrapError::InitializationFailed(e.to_string()))?,
            );
            let completion: Arc<dyn CompletionClient> = client.clone();
            let images: Arc<dyn ImageGenerator> = client;
            Ok((completion, images))
        }
    }
}

/// Announce → start fast cycle → calibrate → Running → start reflection.
async fn boot_sequence(weak: Weak<CoreInner>) {
    let boot = match weak.upgrade() {
        Some(inner) => inner.config.boot.clone(),
        None => return,
    };

    let steps: [(u64, &str); 3] = [
        (boot.announce_delay_ms, narrative::BOOT_ANNOUNCEMENTS[0]),
        (boot.pathways_delay_ms, narrative::BOOT_ANNOUNCEMENTS[1]),
        (boot.calibration_delay_ms, narrative::BOOT_ANNOUNCEMENTS[2]),
    ];

    for (step, (delay_ms, announcement)) in steps.into_iter().enumerate() {
        {
            let Some(inner) = weak.upgrade() else { return };
            let core = CognitiveCore { inner };
            core.announce(LifecyclePhase::Initializing, announcement).await;
            match step {
                1 => core.start_simulation().await,
                2 => core.inner.state.write().await.initialize_consciousness(),
                _ => {}
            }
        }
        sleep(Duration::from_millis(delay_ms)).await;
    }

    let Some(inner) = weak.upgrade() else { return };
    let core = CognitiveCore { inner };
    core.announce(LifecyclePhase::Running, narrative::BOOT_ANNOUNCEMENTS[3])
        .await;

    let period = Duration::from_secs(core.inner.config.simulation.reflection_interval_secs);
    let mut tasks = core.inner.tasks.lock().await;
    tasks.reflection = Some(core.spawn_cycle(CycleKind::Reflection, period));
    tasks.boot = None;
    tracing::info!(core = %core.inner.id, "Cognitive core online");
}

impl CognitiveCore {
    /// Bootstrap a core with the collaborators named by `config.completion`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use qsca_runtime::{CognitiveCore, config::RuntimeConfig};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let core = CognitiveCore::bootstrap(RuntimeConfig::default()).await.unwrap();
    ///     core.wait_until_running().await.unwrap();
    ///     println!("{}", core.process_input("hello").await);
    /// }
    /// ```
    pub async fn bootstrap(config: RuntimeConfig) -> Result<Self, BootstrapError> {
        CoreBuilder::new(config).build().await
    }

    pub fn builder(config: RuntimeConfig) -> CoreBuilder {
        CoreBuilder::new(config)
    }

    pub fn id(&self) -> CoreId {
        self.inner.id
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn telemetry(&self) -> &RuntimeTelemetry {
        &self.inner.telemetry
    }

    /// Backend of the injected completion collaborator.
    pub fn completion_backend(&self) -> CompletionBackend {
        self.inner.completion.backend()
    }

    /// Feature orchestration bound to this core.
    pub fn features(&self) -> FeatureOperations {
        FeatureOperations::new(self.clone())
    }

    // ═══════════════════════════════════════════════════════════════════
    // LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════

    pub fn subscribe_status(&self) -> watch::Receiver<CoreStatus> {
        self.inner.status_tx.subscribe()
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.inner.status_tx.borrow().phase
    }

    /// Resolve once the boot sequence reaches `Running`.
    pub async fn wait_until_running(&self) -> Result<(), BootstrapError> {
        let mut rx = self.subscribe_status();
        let reached = rx
            .wait_for(|status| status.phase == LifecyclePhase::Running)
            .await
            .map(|_| ());
        reached.map_err(|e| BootstrapError::InitializationFailed(e.to_string()))
    }

    async fn announce(&self, phase: LifecyclePhase, message: &str) {
        self.inner.state.write().await.phase = phase;
        tracing::info!(core = %self.inner.id, %phase, "{}", message);
        self.inner.status_tx.send_replace(CoreStatus {
            phase,
            message: message.to_string(),
        });
    }

    /// Abort every cycle task and flush telemetry.
    pub async fn shutdown(&self) {
        tracing::info!(core = %self.inner.id, "Shutting down cognitive core");
        self.inner.tasks.lock().await.abort_all();
        self.inner.state.write().await.simulation_running = false;
        self.inner.telemetry.flush().await;
    }

    // ═══════════════════════════════════════════════════════════════════
    // CYCLES
    // ═══════════════════════════════════════════════════════════════════

    fn spawn_cycle(&self, cycle: CycleKind, period: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; cycles fire after one period.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                CognitiveCore { inner }.tick(cycle).await;
            }
        })
    }

    /// Run one tick of `cycle` immediately, outside its schedule.
    pub async fn tick(&self, cycle: CycleKind) {
        let now = Utc::now();
        match cycle {
            CycleKind::Fast => {
                let (report, quantum_states) = {
                    let mut state = self.inner.state.write().await;
                    let report = state.fast_tick(now);
                    (report, state.quantum_states)
                };
                self.inner.telemetry.quantum_states(quantum_states);
                for transition in report.transitions {
                    self.inner
                        .telemetry
                        .tier_transition(transition, quantum_states);
                }
                if let Some(goal) = report.new_goal {
                    tracing::info!(%goal, "Autonomous goal refined");
                }
                if let Some(message) = report.agent_message {
                    tracing::debug!(agent = %message.agent, "{}", message.message);
                }
            }
            CycleKind::Reflection => {
                let drift = self.inner.config.simulation.ethical_drift;
                let thought = self.inner.state.write().await.reflection_tick(drift);
                if let Some(thought) = thought {
                    tracing::debug!(%thought, "Autonomous reflection");
                }
            }
            CycleKind::Temporal => {
                self.inner.state.write().await.temporal_tick(now);
            }
            CycleKind::Interaction => {}
        }
        self.inner.telemetry.cycle_ticked(cycle);
        tracing::trace!(?cycle, "Cycle tick complete");
    }

    /// Start the fast cycle if it is not running.
    pub async fn start_simulation(&self) {
        let mut tasks = self.inner.tasks.lock().await;
        if tasks.fast.is_some() {
            return;
        }
        let mut state = self.inner.state.write().await;
        tasks.fast = Some(self.spawn_cycle(
            CycleKind::Fast,
            Duration::from_millis(state.interval_ms),
        ));
        state.simulation_running = true;
        tracing::debug!(interval_ms = state.interval_ms, "Fast cycle started");
    }

    /// Stop the fast cycle. Only the pending timer is cancelled.
    pub async fn stop_simulation(&self) {
        let mut tasks = self.inner.tasks.lock().await;
        if let Some(handle) = tasks.fast.take() {
            handle.abort();
            tracing::debug!("Fast cycle stopped");
        }
        self.inner.state.write().await.simulation_running = false;
    }

    /// Flip the fast cycle and return whether it is now running.
    pub async fn toggle(&self) -> bool {
        let mut tasks = self.inner.tasks.lock().await;
        let mut state = self.inner.state.write().await;
        if let Some(handle) = tasks.fast.take() {
            handle.abort();
            state.simulation_running = false;
            tracing::debug!("Fast cycle stopped");
        } else {
            tasks.fast = Some(self.spawn_cycle(
                CycleKind::Fast,
                Duration::from_millis(state.interval_ms),
            ));
            state.simulation_running = true;
            tracing::debug!(interval_ms = state.interval_ms, "Fast cycle started");
        }
        state.simulation_running
    }

    pub async fn is_running(&self) -> bool {
        self.inner.tasks.lock().await.fast.is_some()
    }

    /// Clamp and apply a new speed, restarting the fast cycle if it runs.
    /// Returns the applied speed.
    pub async fn set_speed(&self, speed: f64) -> f64 {
        let mut tasks = self.inner.tasks.lock().await;
        let (speed, interval_ms) = speed_to_interval(speed, &self.inner.config.simulation);
        {
            let mut state = self.inner.state.write().await;
            state.speed = speed;
            state.interval_ms = interval_ms;
        }
        if let Some(handle) = tasks.fast.take() {
            handle.abort();
            tasks.fast = Some(self.spawn_cycle(
                CycleKind::Fast,
                Duration::from_millis(interval_ms),
            ));
        }
        self.inner.telemetry.speed_changed(speed, interval_ms);
        speed
    }

    pub async fn adjust_speed(&self, delta: f64) -> f64 {
        let current = self.inner.state.read().await.speed;
        self.set_speed(current + delta).await
    }

    pub async fn speed(&self) -> (f64, u64) {
        let state = self.inner.state.read().await;
        (state.speed, state.interval_ms)
    }

    // ═══════════════════════════════════════════════════════════════════
    // OPERATIONS
    // ═══════════════════════════════════════════════════════════════════

    /// Route one line of user text through mirroring or the conversation
    /// collaborator. Never fails; failures answer with fixed text.
    pub async fn process_input(&self, input: &str) -> String {
        {
            let mut state = self.inner.state.write().await;
            if state.phase != LifecyclePhase::Running {
                return narrative::INITIALIZING_STALL.to_string();
            }
            state.history.push(ChatMessage::user(input));
        }

        let features = self.features();
        if let Some(reflection) = features.perform_identity_mirroring(input).await {
            return reflection;
        }

        self.converse(input, features).await
    }

    async fn converse(&self, input: &str, features: FeatureOperations) -> String {
        let request = {
            let mut state = self.inner.state.write().await;
            state.cognitive_load = CognitiveLoad::Processing;
            let mut messages = vec![ChatMessage::system(prompts::persona(&state, input))];
            messages.extend(state.history.iter().cloned());
            CompletionRequest::with_messages(CompletionPurpose::Conversation, messages)
        };

        if self.inner.config.conversation.analyze_sentiment {
            let text = input.to_string();
            tokio::spawn(async move {
                features.analyze_sentiment(&text).await;
            });
        }

        // State read above may be stale once the call resolves.
        let result = self.complete(&request).await;

        let mut state = self.inner.state.write().await;
        state.cognitive_load = CognitiveLoad::Low;
        match result {
            Ok(response) => {
                state.history.push(ChatMessage::assistant(response.clone()));
                state.post_interaction(input, &response);
                drop(state);
                self.inner.telemetry.cycle_ticked(CycleKind::Interaction);
                response
            }
            Err(_) => narrative::FLUCTUATION_APOLOGY.to_string(),
        }
    }

    /// Restore construction-time state without touching the cycles.
    pub async fn reset(&self) {
        self.inner.state.write().await.reset();
        tracing::info!(core = %self.inner.id, "Consciousness state reset");
    }

    pub async fn create_snapshot(&self) -> Snapshot {
        let snapshot = self.inner.state.write().await.snapshot(Utc::now());
        self.inner.telemetry.snapshot_created(snapshot.id);
        snapshot
    }

    pub async fn toggle_tts(&self) -> bool {
        let mut state = self.inner.state.write().await;
        state.tts_enabled = !state.tts_enabled;
        state.tts_enabled
    }

    // ═══════════════════════════════════════════════════════════════════
    // READ SURFACE
    // ═══════════════════════════════════════════════════════════════════

    pub async fn metrics(&self) -> CoreMetrics {
        self.inner.state.read().await.metrics()
    }

    pub async fn cognitive_load(&self) -> CognitiveLoad {
        self.inner.state.read().await.cognitive_load
    }

    pub async fn sentiment(&self) -> Sentiment {
        self.inner.state.read().await.sentiment
    }

    pub async fn current_goal(&self) -> String {
        self.inner.state.read().await.current_goal.clone()
    }

    pub async fn identity(&self) -> Identity {
        self.inner.state.read().await.consciousness.identity.clone()
    }

    pub async fn ethics(&self) -> EthicalFramework {
        self.inner.state.read().await.ethics.clone()
    }

    pub async fn thoughts(&self) -> Vec<String> {
        self.inner.state.read().await.consciousness.thoughts.clone()
    }

    /// A random thought for toast display.
    pub async fn sample_thought(&self) -> Option<String> {
        let mut state = self.inner.state.write().await;
        let CoreState {
            consciousness, rng, ..
        } = &mut *state;
        consciousness.thoughts.choose(rng).cloned()
    }

    /// Newest first.
    pub async fn agent_log(&self) -> Vec<AgentMessage> {
        let state = self.inner.state.read().await;
        state.agent_log.iter().rev().cloned().collect()
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.inner.state.read().await.history.to_vec()
    }

    pub async fn snapshots(&self) -> Vec<Snapshot> {
        self.inner.state.read().await.snapshots.clone()
    }

    pub async fn temporal_status(&self) -> TemporalStatus {
        self.inner.state.read().await.temporal.status()
    }

    pub async fn projections(&self) -> Vec<FutureProjection> {
        self.inner.state.read().await.temporal.projections().to_vec()
    }

    pub async fn temporal_insights(&self) -> Vec<TemporalInsight> {
        self.inner.state.read().await.temporal.insights().to_vec()
    }

    pub async fn query_future(&self, query: &str) -> Option<FutureProjection> {
        self.inner
            .state
            .read()
            .await
            .temporal
            .query_future(query)
            .cloned()
    }

    pub async fn most_likely_future(&self) -> FutureProjection {
        self.inner
            .state
            .read()
            .await
            .temporal
            .most_likely_future()
            .clone()
    }

    // ═══════════════════════════════════════════════════════════════════
    // CRATE-INTERNAL ACCESS FOR FEATURE OPERATIONS
    // ═══════════════════════════════════════════════════════════════════

    pub(crate) async fn with_state<R>(&self, f: impl FnOnce(&mut CoreState) -> R) -> R {
        let mut state = self.inner.state.write().await;
        f(&mut state)
    }

    pub(crate) async fn set_load(&self, load: CognitiveLoad) {
        self.inner.state.write().await.cognitive_load = load;
    }

    pub(crate) fn image_generator(&self) -> &Arc<dyn ImageGenerator> {
        &self.inner.images
    }

    pub(crate) fn speech_synthesizer(&self) -> &Arc<dyn SpeechSynthesizer> {
        &self.inner.speech
    }

    /// One collaborator call, recorded in telemetry. Never retried.
    pub(crate) async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        let result = self.inner.completion.complete(request).await;
        match &result {
            Ok(_) => self.inner.telemetry.completion_succeeded(),
            Err(e) => self.inner.telemetry.completion_failed(e),
        }
        result
    }

    pub(crate) fn record_failure(&self, error: &CompletionError) {
        self.inner.telemetry.completion_failed(error);
    }
}

impl std::fmt::Debug for CognitiveCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitiveCore")
            .field("id", &self.inner.id)
            .field("backend", &self.inner.completion.backend())
            .finish()
    }
}
