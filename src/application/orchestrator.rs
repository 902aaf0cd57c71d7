//! Interview orchestrator - the sole entry point consumed by front-ends.
//!
//! Composes the experiment catalog, session registry, conversation store,
//! stage engine, and generation provider into two operations: start a
//! session and process one participant turn.
//!
//! # Concurrency
//!
//! Turn processing serializes per session id through a keyed async mutex:
//! two concurrent `process` calls for the same session run one at a time,
//! while different sessions proceed independently. No lock broader than the
//! session's own is held across the generation call, which may have
//! unbounded latency.
//!
//! # Atomicity
//!
//! Nothing is persisted until the planned step has fully succeeded. A
//! generation failure surfaces a fixed fallback turn and leaves every
//! counter, turn log, and stage untouched, so the same participant turn can
//! be retried.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::domain::conversation::{
    ConversationState, Role, StageEngine, StageStep, TopicTracker,
};
use crate::domain::foundation::{EngineError, SessionId};
use crate::domain::session::{Session, SessionPatch};
use crate::ports::{
    ConversationStore, ExperimentCatalog, GenerationProvider, GenerationRequest, SessionExport,
    SessionRegistry,
};

/// Fixed fallback turn surfaced when the generation collaborator fails.
pub const FALLBACK_MESSAGE: &str = "I'm sorry, I'm having trouble responding right now. \
    Could you share that with me once more?";

/// Sampling settings applied to every generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 512,
        }
    }
}

/// Result of starting a session.
#[derive(Debug, Clone)]
pub struct SessionStart {
    pub session_id: SessionId,
    pub greeting: String,
    pub exchange_count: u32,
}

/// Result of processing one participant turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub response_text: String,
    pub exchange_count: u32,
    pub is_complete: bool,
    pub topics_covered: Vec<String>,
}

/// The conversation orchestration façade.
pub struct Interviewer {
    catalog: Arc<dyn ExperimentCatalog>,
    registry: Arc<dyn SessionRegistry>,
    store: Arc<dyn ConversationStore>,
    provider: Arc<dyn GenerationProvider>,
    settings: GenerationSettings,
    /// Per-session turn locks; the map guard is never held across an await.
    locks: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl Interviewer {
    /// Composes the orchestrator over its collaborators.
    pub fn new(
        catalog: Arc<dyn ExperimentCatalog>,
        registry: Arc<dyn SessionRegistry>,
        store: Arc<dyn ConversationStore>,
        provider: Arc<dyn GenerationProvider>,
    ) -> Self {
        Self {
            catalog,
            registry,
            store,
            provider,
            settings: GenerationSettings::default(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides the default generation settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Ordered ids of the loaded experiments.
    pub fn list_experiments(&self) -> Vec<String> {
        self.catalog.list()
    }

    /// Looks up one experiment definition.
    pub fn get_experiment(
        &self,
        experiment_id: &str,
    ) -> Result<Arc<crate::domain::experiment::ExperimentDefinition>, EngineError> {
        self.catalog
            .get(experiment_id)
            .ok_or_else(|| EngineError::ExperimentNotFound(experiment_id.to_string()))
    }

    /// Starts a new session: validates participant info, creates the session
    /// record, runs the initial stage transition, and persists the greeting.
    pub async fn start(
        &self,
        participant_id: &str,
        experiment_id: &str,
        participant_info: std::collections::BTreeMap<String, String>,
    ) -> Result<SessionStart, EngineError> {
        let definition = self.get_experiment(experiment_id)?;

        let missing = definition.missing_required_fields(&participant_info);
        if !missing.is_empty() {
            return Err(EngineError::missing_fields(missing));
        }

        let session = Session::new(
            SessionId::new(),
            participant_id,
            experiment_id,
            participant_info,
        );
        let session_id = *session.id();

        let state = ConversationState::rehydrate(Vec::new(), 0, true);
        let StageStep::Greet { text: greeting } =
            StageEngine::plan(&definition, &state, None, None)
        else {
            return Err(EngineError::internal("fresh session was not in initial stage"));
        };

        self.registry.create(session).await?;
        self.store
            .append_turn(&session_id, Role::Assistant, &greeting)
            .await?;
        self.registry
            .update(
                &session_id,
                SessionPatch {
                    exchange_count: Some(1),
                    turn_count: Some(1),
                },
            )
            .await?;

        info!(%session_id, experiment_id, "session started");
        Ok(SessionStart {
            session_id,
            greeting,
            exchange_count: 1,
        })
    }

    /// Processes one participant turn: runs exactly one stage-machine
    /// transition under the session's lock and persists its outcome.
    pub async fn process(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let lock = self.session_lock(session_id)?;
        let _guard = lock.lock().await;

        let session = self
            .registry
            .get(session_id)
            .await?
            .ok_or(EngineError::SessionNotFound(*session_id))?;
        let definition = self.get_experiment(session.experiment_id())?;

        let turns = self.store.turns(session_id).await?;
        let state =
            ConversationState::rehydrate(turns, session.exchange_count(), session.is_active());

        let step = StageEngine::plan(&definition, &state, Some(text), session.depth_preference());

        match step {
            StageStep::Acknowledge { text: closing } => {
                // Terminal: acknowledge without advancing anything.
                Ok(TurnOutcome {
                    response_text: closing,
                    exchange_count: state.exchange_count,
                    is_complete: true,
                    topics_covered: state.topics_covered.iter().cloned().collect(),
                })
            }
            StageStep::Close { text: closing } => {
                self.persist_exchange(session_id, &state, text, &closing, false)
                    .await?;
                self.registry.end(session_id).await?;

                info!(%session_id, exchanges = state.exchange_count, "session closed");
                Ok(TurnOutcome {
                    response_text: closing,
                    exchange_count: state.exchange_count,
                    is_complete: true,
                    topics_covered: state.topics_covered.iter().cloned().collect(),
                })
            }
            StageStep::Probe {
                instruction,
                window,
                next_focus,
            } => {
                let request = GenerationRequest::new(instruction)
                    .with_turns(&window)
                    .with_temperature(self.settings.temperature)
                    .with_max_tokens(self.settings.max_tokens);

                let outcome = self.provider.generate(request).await;
                let reply = match outcome {
                    Ok(reply) if !reply.trim().is_empty() => reply,
                    Ok(_) => {
                        return Ok(self.fallback_outcome(session_id, &state, "empty output"))
                    }
                    Err(error) => {
                        return Ok(self.fallback_outcome(session_id, &state, &error.to_string()))
                    }
                };

                self.persist_exchange(session_id, &state, text, &reply, true)
                    .await?;

                let mut topics = state.topics_covered.clone();
                TopicTracker::extend_coverage(&mut topics, &reply);

                info!(%session_id, %next_focus, "follow-up generated");
                Ok(TurnOutcome {
                    response_text: reply,
                    exchange_count: state.exchange_count + 1,
                    is_complete: false,
                    topics_covered: topics.into_iter().collect(),
                })
            }
            StageStep::Greet { text: greeting } => {
                // Unreachable through the public surface: `start` always runs
                // the initial transition. Kept total for defensive callers.
                self.persist_exchange(session_id, &state, text, &greeting, true)
                    .await?;
                Ok(TurnOutcome {
                    response_text: greeting,
                    exchange_count: state.exchange_count + 1,
                    is_complete: false,
                    topics_covered: state.topics_covered.iter().cloned().collect(),
                })
            }
        }
    }

    /// Pure snapshot of everything stored for a session; an unknown session
    /// yields an empty-but-well-formed export.
    pub async fn export(&self, session_id: &SessionId) -> Result<SessionExport, EngineError> {
        self.store.export(session_id).await
    }

    /// Persists one completed exchange: the participant turn, the structured
    /// question/answer pair, the assistant turn, and the session counters.
    async fn persist_exchange(
        &self,
        session_id: &SessionId,
        state: &ConversationState,
        participant_text: &str,
        assistant_text: &str,
        counts_as_exchange: bool,
    ) -> Result<(), EngineError> {
        self.store
            .append_turn(session_id, Role::Participant, participant_text)
            .await?;
        if let Some(question) = state.last_assistant_text() {
            self.store
                .append_response(session_id, question, participant_text)
                .await?;
        }
        self.store
            .append_turn(session_id, Role::Assistant, assistant_text)
            .await?;

        let exchange_count = if counts_as_exchange {
            Some(state.exchange_count + 1)
        } else {
            None
        };
        self.registry
            .update(
                session_id,
                SessionPatch {
                    exchange_count,
                    turn_count: Some(state.turns.len() as u32 + 2),
                },
            )
            .await?;
        Ok(())
    }

    /// Builds the no-advance fallback outcome for a failed generation call.
    ///
    /// State is deliberately untouched so the same participant turn can be
    /// retried.
    fn fallback_outcome(
        &self,
        session_id: &SessionId,
        state: &ConversationState,
        reason: &str,
    ) -> TurnOutcome {
        warn!(
            %session_id,
            provider = self.provider.name(),
            reason,
            "generation failed, surfacing fallback turn"
        );
        TurnOutcome {
            response_text: FALLBACK_MESSAGE.to_string(),
            exchange_count: state.exchange_count,
            is_complete: false,
            topics_covered: state.topics_covered.iter().cloned().collect(),
        }
    }

    /// Fetches or creates the keyed mutex for one session.
    fn session_lock(
        &self,
        session_id: &SessionId,
    ) -> Result<Arc<tokio::sync::Mutex<()>>, EngineError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| EngineError::internal("session lock map poisoned"))?;
        Ok(locks.entry(*session_id).or_default().clone())
    }
}
