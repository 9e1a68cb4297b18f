use crate::{
    config::SessionConfig,
    dispatcher::{BackgroundDispatcher, JobKind, JobPayload},
    errors::CanvasError,
    intent::TurnRequest,
    jobs::SUMMARY_RETAINED_MESSAGES,
    messages::Message,
    model::ChatModel,
    nodes::{self, NodeContext, WebSearchProvider},
    router::{self, UrlContentFetcher},
    state::{GraphState, NodeKind, ThreadState},
    store::{AssistantStore, THREADS_NAMESPACE, THREAD_SUMMARY_KEY},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::warn;

/// Character budget for the model-context log before a summarization job is
/// scheduled. An approximation of a much larger token budget; the gate is
/// exclusive (a log of exactly this size does not trigger).
pub const CONTEXT_CHAR_BUDGET: usize = 300_000;

/// Delay before the reflection job runs, so rapid consecutive edits coalesce
/// into one reflection.
pub const REFLECTION_DELAY: Duration = Duration::from_secs(300);

/// A configured canvas orchestrator. Create sessions from it to run turns
/// against a thread.
pub struct Canvas {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn AssistantStore>,
    dispatcher: Arc<dyn BackgroundDispatcher>,
    web_search: Option<Arc<dyn WebSearchProvider>>,
    url_fetcher: Option<Arc<dyn UrlContentFetcher>>,
    config: SessionConfig,
    reflection_delay: Duration,
    context_char_budget: usize,
}

impl Canvas {
    #[must_use]
    pub fn new(params: CanvasParams) -> Self {
        Self {
            model: params.model,
            store: params.store,
            dispatcher: params.dispatcher,
            web_search: params.web_search,
            url_fetcher: params.url_fetcher,
            config: params.config,
            reflection_delay: params.reflection_delay,
            context_char_budget: params.context_char_budget,
        }
    }

    pub fn builder(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn AssistantStore>,
        dispatcher: Arc<dyn BackgroundDispatcher>,
    ) -> CanvasParams {
        CanvasParams::new(model, store, dispatcher)
    }

    /// Create a session for multi-turn runs against persisted thread state.
    #[must_use]
    pub fn session(&self, thread: ThreadState) -> CanvasSession {
        CanvasSession {
            thread,
            ctx: NodeContext {
                model: self.model.clone(),
                store: self.store.clone(),
                web_search: self.web_search.clone(),
                url_fetcher: self.url_fetcher.clone(),
                config: self.config.clone(),
            },
            dispatcher: self.dispatcher.clone(),
            reflection_delay: self.reflection_delay,
            context_char_budget: self.context_char_budget,
        }
    }
}

/// Parameters required to create a new canvas.
/// # Default Values
/// - `web_search`: `None`
/// - `url_fetcher`: `None`
/// - `config`: empty
/// - `reflection_delay`: 300 seconds
/// - `context_char_budget`: 300,000 characters
pub struct CanvasParams {
    pub model: Arc<dyn ChatModel>,
    pub store: Arc<dyn AssistantStore>,
    pub dispatcher: Arc<dyn BackgroundDispatcher>,
    pub web_search: Option<Arc<dyn WebSearchProvider>>,
    pub url_fetcher: Option<Arc<dyn UrlContentFetcher>>,
    pub config: SessionConfig,
    pub reflection_delay: Duration,
    pub context_char_budget: usize,
}

impl CanvasParams {
    pub fn new(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn AssistantStore>,
        dispatcher: Arc<dyn BackgroundDispatcher>,
    ) -> Self {
        Self {
            model,
            store,
            dispatcher,
            web_search: None,
            url_fetcher: None,
            config: SessionConfig::default(),
            reflection_delay: REFLECTION_DELAY,
            context_char_budget: CONTEXT_CHAR_BUDGET,
        }
    }

    /// Set the web search collaborator.
    #[must_use]
    pub fn web_search(mut self, web_search: Arc<dyn WebSearchProvider>) -> Self {
        self.web_search = Some(web_search);
        self
    }

    /// Set the URL content retrieval collaborator.
    #[must_use]
    pub fn url_fetcher(mut self, url_fetcher: Arc<dyn UrlContentFetcher>) -> Self {
        self.url_fetcher = Some(url_fetcher);
        self
    }

    /// Set the session configuration.
    #[must_use]
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the delay before reflection jobs run.
    #[must_use]
    pub fn reflection_delay(mut self, delay: Duration) -> Self {
        self.reflection_delay = delay;
        self
    }

    /// Set the context character budget that triggers summarization.
    #[must_use]
    pub fn context_char_budget(mut self, budget: usize) -> Self {
        self.context_char_budget = budget;
        self
    }

    #[must_use]
    pub fn build(self) -> Canvas {
        Canvas::new(self)
    }
}

/// The result of one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The transformation node that executed.
    pub node: NodeKind,
    /// Messages appended to the visible log during the turn, beyond the
    /// user's own input.
    pub new_messages: Vec<Message>,
}

/// A stateful multi-turn canvas session over one thread.
pub struct CanvasSession {
    thread: ThreadState,
    ctx: NodeContext,
    dispatcher: Arc<dyn BackgroundDispatcher>,
    reflection_delay: Duration,
    context_char_budget: usize,
}

impl CanvasSession {
    #[must_use]
    pub fn thread(&self) -> &ThreadState {
        &self.thread
    }

    #[must_use]
    pub fn into_thread(self) -> ThreadState {
        self.thread
    }

    /// Run one turn: route, execute exactly one transformation, run the
    /// post-action pipeline, then the maintenance gate. Fatal errors abort
    /// the turn without persisting any state; the append-only artifact model
    /// guarantees no content is left half-written.
    pub async fn run_turn(&mut self, request: TurnRequest) -> Result<TurnOutcome, CanvasError> {
        self.absorb_pending_summary().await;

        let mut state = GraphState::fresh(&self.thread, &request);
        let input_len = state.ledger.visible.len();

        let routed = router::route(&mut state, &self.ctx).await;
        state.next = Some(routed);

        // The web search sub-graph resolves to a follow-on artifact node.
        let executed = if routed == NodeKind::WebSearch {
            let outcome = nodes::web_search(&state, &self.ctx).await?;
            state.apply(outcome.delta);
            state.next = Some(outcome.next);
            outcome.next
        } else {
            routed
        };

        let delta = nodes::run(executed, &state, &self.ctx).await?;
        state.apply(delta);

        if executed.touches_artifact() {
            let followup = nodes::generate_followup(&state, &self.ctx).await?;
            state.apply(followup);
            self.dispatcher
                .submit(
                    JobKind::Reflection,
                    self.payload(state.ledger.visible.clone(), state.artifact.clone()),
                    self.reflection_delay,
                )
                .await;
        }

        self.maintenance_gate(&state).await;

        let new_messages = state.ledger.visible[input_len..].to_vec();
        self.thread.ledger = state.ledger;
        self.thread.artifact = state.artifact;

        Ok(TurnOutcome {
            node: executed,
            new_messages,
        })
    }

    /// After every turn: first-turn title generation, or summarization once
    /// the context log exceeds its character budget. Mutually exclusive,
    /// first match wins.
    async fn maintenance_gate(&self, state: &GraphState) {
        if state.ledger.visible.len() <= 2 {
            self.dispatcher
                .submit(
                    JobKind::ThreadTitle,
                    self.payload(state.ledger.visible.clone(), state.artifact.clone()),
                    Duration::ZERO,
                )
                .await;
        } else if state.ledger.context_char_len() > self.context_char_budget {
            self.dispatcher
                .submit(
                    JobKind::Summarizer,
                    self.payload(state.ledger.context.clone(), state.artifact.clone()),
                    Duration::ZERO,
                )
                .await;
        }
    }

    /// Apply a summary delivered by a finished summarizer job, condensing the
    /// context log. Best-effort: store failures are logged and ignored.
    async fn absorb_pending_summary(&mut self) {
        let Some(thread_id) = self.ctx.config.thread_id.as_deref() else {
            return;
        };
        let namespace = [THREADS_NAMESPACE, thread_id];
        let summary = match self.ctx.store.get(&namespace, THREAD_SUMMARY_KEY).await {
            Ok(Some(value)) if !value.is_null() => value,
            Ok(_) => return,
            Err(err) => {
                warn!(error = %err, "failed to read pending summary");
                return;
            }
        };
        match serde_json::from_value::<Message>(summary) {
            Ok(message) => {
                self.thread
                    .ledger
                    .condense(message, SUMMARY_RETAINED_MESSAGES);
                // Consume the summary so it is applied exactly once.
                if let Err(err) = self
                    .ctx
                    .store
                    .put(&namespace, THREAD_SUMMARY_KEY, Value::Null)
                    .await
                {
                    warn!(error = %err, "failed to consume pending summary");
                }
            }
            Err(err) => {
                warn!(error = %err, "malformed pending summary; ignoring");
            }
        }
    }

    fn payload(
        &self,
        messages: Vec<Message>,
        artifact: Option<crate::artifact::Artifact>,
    ) -> JobPayload {
        JobPayload {
            thread_id: self
                .ctx
                .config
                .thread_id
                .clone()
                .unwrap_or_default(),
            assistant_id: self.ctx.config.assistant_id.clone(),
            messages,
            artifact,
        }
    }
}
