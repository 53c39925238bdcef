//! The Streaming Engine (spec §4.8): drives one assistant turn end-to-end,
//! from `triggerStream` through the per-turn algorithm to the terminal
//! `complete | abort | error` event.
//!
//! Grounded in `core/loop::driver` (`AgentLoop`/`AgentLoopBuilder`)'s
//! per-session turn loop and cancellation wiring, and in
//! [`relay_compaction::service::CompactionService`]'s scoped-lock /
//! `snafu::ResultExt` style for the multi-step mutation this turn performs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use futures::StreamExt;
use relay_config::AiConfig;
use relay_config::ProviderConfig as ProviderCredentials;
use relay_context::ContextAssembler;
use relay_context::ContextCalculator;
use relay_context::FileContentSource;
use relay_error::ErrorExt;
use relay_event_bus::EventBus;
use relay_model_registry::ModelRegistry;
use relay_protocol::FileContent;
use relay_protocol::Message;
use relay_protocol::MessageMetadata;
use relay_protocol::MessageRole;
use relay_protocol::MessageStatus;
use relay_protocol::Part;
use relay_protocol::PartStatus;
use relay_protocol::ResourceSnapshot;
use relay_protocol::StreamEvent;
use relay_provider::CompletionOptions;
use relay_provider::ProviderRegistry;
use relay_provider::ProviderStreamEvent;
use relay_provider::ToolSchema;
use relay_session_store::SessionStore;
use relay_session_store::TokenUpdate;
use relay_tools::ToolContext;
use relay_tools::ToolExecutor;
use relay_tools::ToolRegistry;
use relay_triggers::TriggerContext;
use relay_triggers::TriggerLayer;
use snafu::ResultExt;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use tracing::warn;

use crate::error::Result;
use crate::error::streaming_error::ContextSnafu;
use crate::error::streaming_error::ModelRegistrySnafu;
use crate::error::streaming_error::ProviderSnafu;
use crate::error::streaming_error::SessionNotFoundSnafu;
use crate::error::streaming_error::StoreSnafu;
use crate::error::streaming_error::UnknownProviderSnafu;
use crate::events::emit;
use crate::fallback::FallbackTarget;
use crate::fallback::is_fallback_eligible;
use crate::locks::StreamLocks;
use crate::title::generate_title;
use crate::tokens;

/// The fixed instructions every turn's prompt is implicitly built against.
/// Concrete per-agent personas are out of scope for this core (spec §1);
/// this single generic instruction set is what `baseContextTokens` (spec
/// §4.8.2) is computed from.
pub const SYSTEM_PROMPT: &str = "You are a careful, direct AI coding assistant. \
Use the available tools to inspect and modify the user's project. Prefer the \
smallest change that satisfies the request, and explain what you changed \
only when it would not be obvious from the diff.";

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

fn provider_credentials(config: Option<&ProviderCredentials>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Some(config) = config else {
        return map;
    };
    if let Some(key) = &config.api_key {
        map.insert("api_key".to_string(), key.clone());
    }
    if let Some(base_url) = &config.base_url {
        map.insert("base_url".to_string(), base_url.clone());
    }
    if let Some(model) = &config.default_model {
        map.insert("default_model".to_string(), model.clone());
    }
    map
}

/// An in-memory [`FileContentSource`] pre-populated with every file a
/// turn's messages reference, since [`ContextAssembler::assemble`] is
/// synchronous and the store's file lookup is not.
struct PreloadedFiles(HashMap<String, FileContent>);

impl FileContentSource for PreloadedFiles {
    fn get_file_content(&self, id: &str) -> Option<FileContent> {
        self.0.get(id).cloned()
    }
}

fn referenced_file_content_ids(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .flat_map(|m| m.steps.iter())
        .flat_map(|s| s.parts.iter())
        .filter_map(|p| match p {
            Part::FileRef { file_content_id, .. } => Some(file_content_id.clone()),
            _ => None,
        })
        .collect()
}

fn tool_schemas_for(tool_registry: &ToolRegistry, model_id: &str) -> Vec<ToolSchema> {
    tool_registry
        .available_for_model(model_id)
        .into_iter()
        .map(|tool| {
            let info = tool.info();
            // `name` doubles as the registry lookup key here: it's what the
            // provider echoes back in `ToolCall`/`ToolInputStart`, and the
            // engine dispatches to `ToolExecutor::execute` by that same
            // string, so it must be the tool's registry id, not its
            // display name.
            ToolSchema {
                name: info.id.clone(),
                description: info.description.clone(),
                input_schema: info.input_schema.clone(),
            }
        })
        .collect()
}

/// Input to [`StreamingEngine::trigger_stream`] (spec §4.8 `triggerStream`).
#[derive(Debug, Clone, Default)]
pub struct TriggerStreamInput {
    pub session_id: Option<String>,
    pub provider_id: Option<String>,
    pub model_id: Option<String>,
    pub agent_id: Option<String>,
    pub enabled_rule_ids: Option<Vec<String>>,
    pub content: Option<Vec<Part>>,
    pub resource_snapshot: Option<ResourceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerStreamOutput {
    pub session_id: String,
}

/// Drives every assistant turn (spec §4.8). Holds references to every
/// other core component; effectively a thin coordinator, not a store of
/// its own (spec §9 "one session-owning service exposing methods").
pub struct StreamingEngine {
    session_store: Arc<SessionStore>,
    event_bus: Arc<EventBus>,
    model_registry: Arc<ModelRegistry>,
    provider_registry: Arc<ProviderRegistry>,
    tool_registry: Arc<ToolRegistry>,
    tool_executor: Arc<ToolExecutor>,
    trigger_layer: Arc<TriggerLayer>,
    config: Arc<RwLock<AiConfig>>,
    locks: Arc<StreamLocks>,
    calculator: ContextCalculator,
    cancellations: StdMutex<HashMap<String, CancellationToken>>,
    fallback: Option<FallbackTarget>,
}

impl StreamingEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_store: Arc<SessionStore>,
        event_bus: Arc<EventBus>,
        model_registry: Arc<ModelRegistry>,
        provider_registry: Arc<ProviderRegistry>,
        tool_registry: Arc<ToolRegistry>,
        trigger_layer: Arc<TriggerLayer>,
        config: Arc<RwLock<AiConfig>>,
    ) -> Self {
        Self {
            tool_executor: Arc::new(ToolExecutor::new(Arc::clone(&tool_registry))),
            session_store,
            event_bus,
            model_registry,
            provider_registry,
            tool_registry,
            trigger_layer,
            config,
            locks: Arc::new(StreamLocks::new()),
            calculator: ContextCalculator::default(),
            cancellations: StdMutex::new(HashMap::new()),
            fallback: None,
        }
    }

    /// Configures a secondary model to fall back to when the primary
    /// model's stream fails before any content was emitted (spec §4.8
    /// supplemental). Disabled by default.
    pub fn with_fallback(mut self, target: FallbackTarget) -> Self {
        self.fallback = Some(target);
        self
    }

    /// Cancels the in-flight turn on `session_id`, if any (spec §4.8 step 7).
    /// A no-op if no turn is currently streaming on this session.
    pub fn abort(&self, session_id: &str) {
        if let Some(token) = self.cancellations.lock().expect("cancellation map poisoned").get(session_id) {
            token.cancel();
        }
    }

    /// Replays then follows a session's event channel (spec §4.8
    /// `subscribe`).
    pub async fn subscribe(&self, session_id: &str, replay_last: usize) -> relay_event_bus::EventStream {
        self.event_bus.subscribe_with_history(session_id, replay_last).await
    }

    /// `triggerStream` (spec §4.8): creates/reuses a session, appends the
    /// user message if content was given, and spawns the turn in the
    /// background, returning as soon as the session is ready.
    #[instrument(skip(self, input), fields(session_id = input.session_id.as_deref().unwrap_or("<new>")))]
    pub async fn trigger_stream(self: &Arc<Self>, input: TriggerStreamInput) -> Result<TriggerStreamOutput> {
        let now = now_ms();

        let session_id = match &input.session_id {
            Some(id) => {
                self.session_store.get_session_by_id(id).await.context(StoreSnafu)?.ok_or_else(|| SessionNotFoundSnafu { session_id: id.clone() }.build())?;
                id.clone()
            }
            None => {
                let provider_id = input.provider_id.clone().unwrap_or_default();
                let model_id = input.model_id.clone().unwrap_or_default();
                if self.provider_registry.get(&provider_id).is_err() {
                    return Err(UnknownProviderSnafu { provider_id }.build());
                }
                let agent_id = input.agent_id.clone().unwrap_or_else(|| "default".to_string());
                let enabled_rule_ids = input.enabled_rule_ids.clone().unwrap_or_default();
                let session = self.session_store.create_session(provider_id.clone(), model_id.clone(), agent_id, enabled_rule_ids, now).await.context(StoreSnafu)?;

                let model = self.model_registry.get_model(&model_id).context(ModelRegistrySnafu)?;
                let schemas = tool_schemas_for(&self.tool_registry, &model.id);
                let base_context_tokens = tokens::base_context_tokens(&self.calculator, SYSTEM_PROMPT, &schemas);
                self.session_store
                    .update_session_tokens(&session.id, TokenUpdate { base_context_tokens: Some(base_context_tokens), total_tokens: Some(base_context_tokens) }, now)
                    .await
                    .context(StoreSnafu)?;

                emit(&self.event_bus, &session.id, StreamEvent::SessionCreated { session_id: session.id.clone(), provider: provider_id, model: model_id }).await;
                session.id
            }
        };

        if let Some(content) = input.content {
            let metadata = input.resource_snapshot.map(|snapshot| MessageMetadata { resource_snapshot: Some(snapshot) });
            let (_, todo_snapshot) = self.todo_snapshot(&session_id).await?;
            let message_id = self.session_store.add_message(&session_id, MessageRole::User, content.clone(), metadata, Some(todo_snapshot), now).await.context(StoreSnafu)?;
            emit(&self.event_bus, &session_id, StreamEvent::UserMessageCreated { message_id, content: serde_json::to_value(&content).unwrap_or_default() }).await;
            self.recompute_tokens(&session_id, now).await?;
        }

        let guard = self.locks.try_acquire(&session_id)?;
        let cancel = CancellationToken::new();
        self.cancellations.lock().expect("cancellation map poisoned").insert(session_id.clone(), cancel.clone());

        let engine = Arc::clone(self);
        let turn_session_id = session_id.clone();
        tokio::spawn(async move {
            engine.run_turn(&turn_session_id, cancel).await;
            engine.cancellations.lock().expect("cancellation map poisoned").remove(&turn_session_id);
            drop(guard);
        });

        Ok(TriggerStreamOutput { session_id })
    }

    async fn todo_snapshot(&self, session_id: &str) -> Result<(i64, Vec<relay_protocol::Todo>)> {
        let (session, _) = self.session_store.get_session_by_id(session_id).await.context(StoreSnafu)?.ok_or_else(|| SessionNotFoundSnafu { session_id: session_id.to_string() }.build())?;
        Ok((session.next_todo_id as i64, session.todos))
    }

    async fn recompute_tokens(&self, session_id: &str, now: i64) -> Result<()> {
        let (session, messages) = self.session_store.get_session_by_id(session_id).await.context(StoreSnafu)?.ok_or_else(|| SessionNotFoundSnafu { session_id: session_id.to_string() }.build())?;
        let files = self.load_referenced_files(&messages).await?;
        let total = tokens::total_tokens(&self.calculator, session.base_context_tokens, &messages, &files);
        self.session_store.update_session_tokens(session_id, TokenUpdate { base_context_tokens: None, total_tokens: Some(total) }, now).await.context(StoreSnafu)?;
        emit(&self.event_bus, session_id, StreamEvent::SessionTokensUpdated { base_context_tokens: session.base_context_tokens, total_tokens: total }).await;
        Ok(())
    }

    /// Resolves every file a `Part::FileRef` among `messages` points to, for
    /// callers that need the content rather than just the reference (the
    /// Context Assembler's prompt and the token estimator both do).
    async fn load_referenced_files(&self, messages: &[Message]) -> Result<HashMap<String, FileContent>> {
        let mut files = HashMap::new();
        for id in referenced_file_content_ids(messages) {
            if let Some(content) = self.session_store.get_file_content(&id).await.context(StoreSnafu)? {
                files.insert(id, content);
            }
        }
        Ok(files)
    }

    /// Runs one full turn (spec §4.8 steps 2-9), translating failures into
    /// the appropriate terminal stream event rather than propagating them —
    /// by this point `triggerStream` has already returned to its caller.
    async fn run_turn(&self, session_id: &str, cancel: CancellationToken) {
        if let Err(err) = self.run_turn_inner(session_id, &cancel).await {
            warn!(session_id, %err, "turn failed");
        }
    }

    async fn run_turn_inner(&self, session_id: &str, cancel: &CancellationToken) -> Result<()> {
        let now = now_ms();

        // Step 2: Trigger Layer.
        let (session, turn_messages) = self.session_store.get_session_by_id(session_id).await.context(StoreSnafu)?.ok_or_else(|| SessionNotFoundSnafu { session_id: session_id.to_string() }.build())?;
        let model = self.model_registry.get_model(&session.model_id).context(ModelRegistrySnafu)?.clone();
        let snapshot = turn_messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, MessageRole::User))
            .and_then(|m| m.metadata.as_ref())
            .and_then(|m| m.resource_snapshot)
            .unwrap_or_default();
        let ctx = TriggerContext { current_tokens: session.total_tokens, max_tokens: model.max_context as u64, cpu_percent: snapshot.cpu_percent, memory_percent: snapshot.memory_percent };
        let result = self.trigger_layer.evaluate_all(&session, &ctx, &session.enabled_rule_ids).await;

        if !result.flag_updates.is_empty() {
            self.session_store.update_session_flags(session_id, result.flag_updates, now).await.context(StoreSnafu)?;
        }
        for message in &result.system_messages {
            let (_, todo_snapshot) = self.todo_snapshot(session_id).await?;
            let part = Part::SystemMessage { content: message.clone(), message_type: "trigger".to_string(), timestamp: now, status: PartStatus::Completed };
            let message_id = self.session_store.add_message(session_id, MessageRole::System, vec![part], None, Some(todo_snapshot), now).await.context(StoreSnafu)?;
            emit(&self.event_bus, session_id, StreamEvent::SystemMessageCreated { message_id, content: message.clone() }).await;
        }
        if !result.system_messages.is_empty() {
            self.recompute_tokens(session_id, now).await?;
        }

        // Step 3: Context Assembler.
        let (session, messages) = self.session_store.get_session_by_id(session_id).await.context(StoreSnafu)?.ok_or_else(|| SessionNotFoundSnafu { session_id: session_id.to_string() }.build())?;
        let files = self.load_referenced_files(&messages).await?;
        let file_source = PreloadedFiles(files);
        let prompt = ContextAssembler::assemble(&messages, &model, &file_source).context(ContextSnafu)?;
        let schemas = tool_schemas_for(&self.tool_registry, &model.id);

        // Step 4: create the assistant message.
        let assistant_message_id = self.session_store.add_message(session_id, MessageRole::Assistant, Vec::new(), None, None, now_ms()).await.context(StoreSnafu)?;
        emit(&self.event_bus, session_id, StreamEvent::AssistantMessageCreated { message_id: assistant_message_id.clone() }).await;

        let provider = self.provider_registry.get(&session.provider_id).context(ProviderSnafu)?;
        let credentials = provider_credentials(self.config.read().await.provider(&session.provider_id));

        let turn = Turn {
            engine: self,
            session_id: session_id.to_string(),
            assistant_message_id: assistant_message_id.clone(),
            current_step_index: 0,
        };

        // Step 5 (and spec §4.8 supplemental fallback): the primary stream
        // hasn't emitted any content yet at this point, so a retryable
        // network/protocol failure here is exactly the window the fallback
        // policy covers.
        let opened: Result<(relay_provider::CompletionStream, String, String, HashMap<String, String>)> =
            match provider.open_completion(&credentials, &model.id, &prompt, &schemas, &CompletionOptions::default(), cancel.clone()).await {
                Ok(stream) => Ok((stream, session.provider_id.clone(), model.id.clone(), credentials.clone())),
                Err(err) => {
                    let target = self.fallback.clone().filter(|t| is_fallback_eligible(err.status_code()) && (t.provider_id != session.provider_id || t.model_id != model.id));
                    match target {
                        Some(target) => {
                            warn!(session_id, primary_model = %model.id, fallback_model = %target.model_id, error = %err, "primary model stream failed before any content was emitted, falling back");
                            self.open_fallback_stream(&target, &messages, &file_source, cancel).await
                        }
                        None => Err(err).context(ProviderSnafu),
                    }
                }
            };

        let (stream, used_provider_id, used_model_id, used_credentials) = match opened {
            Ok(opened) => opened,
            Err(err) => {
                self.finish_error(session_id, &assistant_message_id, &err.to_string()).await?;
                return Ok(());
            }
        };

        if let Err(err) = turn.drive(stream, cancel).await {
            self.finish_error(session_id, &assistant_message_id, &err.to_string()).await?;
            return Ok(());
        }

        self.after_terminal(session_id, &assistant_message_id, &used_provider_id, &used_model_id, &used_credentials, &messages).await?;
        Ok(())
    }

    /// Opens a stream against the configured fallback target, re-assembling
    /// the prompt for its model (spec §4.8 supplemental).
    async fn open_fallback_stream(
        &self,
        target: &FallbackTarget,
        messages: &[Message],
        file_source: &PreloadedFiles,
        cancel: &CancellationToken,
    ) -> Result<(relay_provider::CompletionStream, String, String, HashMap<String, String>)> {
        let fallback_provider = self.provider_registry.get(&target.provider_id).context(ProviderSnafu)?;
        let fallback_model = self.model_registry.get_model(&target.model_id).context(ModelRegistrySnafu)?.clone();
        let fallback_credentials = provider_credentials(self.config.read().await.provider(&target.provider_id));
        let fallback_prompt = ContextAssembler::assemble(messages, &fallback_model, file_source).context(ContextSnafu)?;
        let fallback_schemas = tool_schemas_for(&self.tool_registry, &fallback_model.id);
        let stream = fallback_provider
            .open_completion(&fallback_credentials, &fallback_model.id, &fallback_prompt, &fallback_schemas, &CompletionOptions::default(), cancel.clone())
            .await
            .context(ProviderSnafu)?;
        Ok((stream, target.provider_id.clone(), fallback_model.id.clone(), fallback_credentials))
    }

    async fn finish_error(&self, session_id: &str, message_id: &str, error: &str) -> Result<()> {
        let step_index = match self.session_store.get_session_by_id(session_id).await {
            Ok(Some((_, msgs))) => msgs.iter().find(|m| m.id == message_id).map(|m| m.next_step_index()).unwrap_or(0),
            _ => 0,
        };
        let _ = self.session_store.append_step(message_id, step_index, vec![Part::Error { error: error.to_string(), status: PartStatus::Error }]).await;
        let _ = self.session_store.update_message_status(message_id, MessageStatus::Error, None, None).await;
        emit(&self.event_bus, session_id, StreamEvent::MessageStatusUpdated { message_id: message_id.to_string(), status: MessageStatus::Error, usage: None, finish_reason: None }).await;
        emit(&self.event_bus, session_id, StreamEvent::Error { error: error.to_string() }).await;
        Ok(())
    }

    /// Step 9: background title generation plus token recompute, run after
    /// every terminal event regardless of outcome.
    async fn after_terminal(
        &self,
        session_id: &str,
        assistant_message_id: &str,
        provider_id: &str,
        model_id: &str,
        credentials: &HashMap<String, String>,
        messages_before: &[Message],
    ) -> Result<()> {
        let now = now_ms();
        self.recompute_tokens(session_id, now).await?;

        let (session, _) = self.session_store.get_session_by_id(session_id).await.context(StoreSnafu)?.ok_or_else(|| SessionNotFoundSnafu { session_id: session_id.to_string() }.build())?;
        if session.title.is_none() && !messages_before.is_empty() {
            if let Ok(provider) = self.provider_registry.get(provider_id) {
                let seed_text = messages_before
                    .iter()
                    .rev()
                    .find(|m| matches!(m.role, MessageRole::User))
                    .map(|m| m.steps.iter().flat_map(|s| s.parts.iter()).filter_map(|p| match p { Part::Text { content, .. } => Some(content.clone()), _ => None }).collect::<Vec<_>>().join(" "))
                    .unwrap_or_default();
                if !seed_text.is_empty() {
                    tokio::spawn(generate_title(Arc::clone(&self.session_store), Arc::clone(&self.event_bus), provider, credentials.clone(), model_id.to_string(), session_id.to_string(), seed_text, now));
                }
            }
        }
        let _ = assistant_message_id;
        Ok(())
    }
}

/// Per-turn mutable state for translating `ProviderStreamEvent`s into
/// `StreamEvent`s plus Session Store writes (spec §4.8 step 5). One step
/// is opened per content block (a text run, a reasoning run, one tool
/// call, or one file) and closed with `step-complete` when that block ends.
struct Turn<'a> {
    engine: &'a StreamingEngine,
    session_id: String,
    assistant_message_id: String,
    current_step_index: u32,
}

/// What's accumulating inside the currently-open step, if any.
enum ActiveStep {
    Text(String),
    Reasoning { text: String, start_time: i64 },
    Tool { tool_call_id: String, tool_name: String, input: serde_json::Value, start_time: i64 },
}

impl Turn<'_> {
    async fn drive(mut self, mut stream: relay_provider::CompletionStream, cancel: &CancellationToken) -> Result<()> {
        let mut active: Option<ActiveStep> = None;
        let mut step_started_at = now_ms();

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.finish_abort(active).await?;
                    return Ok(());
                }
                event = stream.next() => event,
            };

            let Some(event) = event else {
                // Stream ended without an explicit `Finish` — treat as a
                // clean completion with no usage information.
                self.close_active_step(active.take(), step_started_at, "stop").await?;
                self.finish_complete(None, Some("stop".to_string())).await?;
                return Ok(());
            };

            match event {
                ProviderStreamEvent::TextStart => {
                    active = Some(ActiveStep::Text(String::new()));
                    step_started_at = now_ms();
                    self.open_step().await?;
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::TextStart).await;
                }
                ProviderStreamEvent::TextDelta { text } => {
                    if let Some(ActiveStep::Text(buf)) = &mut active {
                        buf.push_str(&text);
                    }
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::TextDelta { text }).await;
                }
                ProviderStreamEvent::TextEnd => {
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::TextEnd).await;
                    self.close_active_step(active.take(), step_started_at, "stop").await?;
                }
                ProviderStreamEvent::ReasoningStart => {
                    active = Some(ActiveStep::Reasoning { text: String::new(), start_time: now_ms() });
                    step_started_at = now_ms();
                    self.open_step().await?;
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::ReasoningStart).await;
                }
                ProviderStreamEvent::ReasoningDelta { text } => {
                    if let Some(ActiveStep::Reasoning { text: buf, .. }) = &mut active {
                        buf.push_str(&text);
                    }
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::ReasoningDelta { text }).await;
                }
                ProviderStreamEvent::ReasoningEnd => {
                    let duration_ms = match &active {
                        Some(ActiveStep::Reasoning { start_time, .. }) => (now_ms() - start_time).max(0) as u64,
                        _ => 0,
                    };
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::ReasoningEnd { duration_ms }).await;
                    self.close_active_step(active.take(), step_started_at, "stop").await?;
                }
                ProviderStreamEvent::ToolInputStart { tool_call_id, tool_name: _ } => {
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::ToolInputStart { tool_call_id }).await;
                }
                ProviderStreamEvent::ToolInputDelta { tool_call_id, input_text_delta } => {
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::ToolInputDelta { tool_call_id, input_text_delta }).await;
                }
                ProviderStreamEvent::ToolInputEnd { tool_call_id } => {
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::ToolInputEnd { tool_call_id }).await;
                }
                ProviderStreamEvent::ToolCall { tool_call_id, tool_name, input } => {
                    step_started_at = now_ms();
                    self.open_step().await?;
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::ToolCall { tool_call_id: tool_call_id.clone(), tool_name: tool_name.clone(), input: input.clone() }).await;

                    let part = Part::Tool { tool_id: tool_call_id.clone(), name: tool_name.clone(), input: input.clone(), result: None, error: None, status: PartStatus::Active, start_time: step_started_at, duration_ms: None };
                    self.engine.session_store.append_step(&self.assistant_message_id, self.current_step_index, vec![part]).await.context(StoreSnafu)?;

                    let tool_ctx = ToolContext::new(self.session_id.clone(), tool_call_id.clone(), cancel.clone());
                    let outcome = self.engine.tool_executor.execute(&tool_name, input, &tool_ctx, None).await;

                    if outcome.success {
                        self.engine
                            .session_store
                            .update_tool_part(&self.assistant_message_id, &tool_call_id, PartStatus::Completed, outcome.output.clone(), None, outcome.duration_ms)
                            .await
                            .context(StoreSnafu)?;
                        emit(&self.engine.event_bus, &self.session_id, StreamEvent::ToolResult { tool_call_id: tool_call_id.clone(), tool_name: tool_name.clone(), result: outcome.output.unwrap_or(serde_json::Value::Null), duration_ms: outcome.duration_ms }).await;
                    } else {
                        let error = outcome.error.clone().unwrap_or_else(|| "tool execution failed".to_string());
                        self.engine.session_store.update_tool_part(&self.assistant_message_id, &tool_call_id, PartStatus::Error, None, Some(error.clone()), outcome.duration_ms).await.context(StoreSnafu)?;
                        emit(&self.engine.event_bus, &self.session_id, StreamEvent::ToolError { tool_call_id, tool_name, error, duration_ms: outcome.duration_ms }).await;
                    }
                    self.close_step_complete(step_started_at, "tool_use").await?;
                }
                ProviderStreamEvent::File { media_type, base64 } => {
                    step_started_at = now_ms();
                    self.open_step().await?;
                    emit(&self.engine.event_bus, &self.session_id, StreamEvent::File { media_type: media_type.clone(), base64: base64.clone() }).await;
                    let size = base64.len() as u64;
                    let part = Part::File { relative_path: format!("generated-{}", self.assistant_message_id), size, media_type, base64, status: PartStatus::Completed };
                    self.engine.session_store.append_part(&self.assistant_message_id, self.current_step_index, part).await.context(StoreSnafu)?;
                    self.close_step_complete(step_started_at, "stop").await?;
                }
                ProviderStreamEvent::Finish { usage, finish_reason } => {
                    self.close_active_step(active.take(), step_started_at, &finish_reason).await?;
                    self.finish_complete(Some(usage), Some(finish_reason)).await?;
                    return Ok(());
                }
            }
        }
    }

    async fn open_step(&self) -> Result<()> {
        let (_, todo_snapshot) = self.engine.todo_snapshot(&self.session_id).await?;
        emit(
            &self.engine.event_bus,
            &self.session_id,
            StreamEvent::StepStart { step_id: format!("{}-{}", self.assistant_message_id, self.current_step_index), step_index: self.current_step_index, metadata: serde_json::Value::Null, todo_snapshot, system_messages: None },
        )
        .await;
        Ok(())
    }

    /// Persists the buffered text/reasoning part (if one was open) as one
    /// `append_step` call, then emits `step-complete` and advances the
    /// step index.
    async fn close_active_step(&mut self, active: Option<ActiveStep>, started_at: i64, finish_reason: &str) -> Result<()> {
        match active {
            Some(ActiveStep::Text(text)) => {
                let part = Part::Text { content: text, status: PartStatus::Completed };
                self.engine.session_store.append_step(&self.assistant_message_id, self.current_step_index, vec![part]).await.context(StoreSnafu)?;
                self.close_step_complete(started_at, finish_reason).await?;
            }
            Some(ActiveStep::Reasoning { text, start_time }) => {
                let end_time = now_ms();
                let part = Part::Reasoning { content: text, status: PartStatus::Completed, start_time, end_time: Some(end_time), duration_ms: Some((end_time - start_time).max(0) as u64) };
                self.engine.session_store.append_step(&self.assistant_message_id, self.current_step_index, vec![part]).await.context(StoreSnafu)?;
                self.close_step_complete(started_at, finish_reason).await?;
            }
            Some(ActiveStep::Tool { .. }) | None => {}
        }
        Ok(())
    }

    async fn close_step_complete(&mut self, started_at: i64, finish_reason: &str) -> Result<()> {
        let duration_ms = (now_ms() - started_at).max(0) as u64;
        emit(
            &self.engine.event_bus,
            &self.session_id,
            StreamEvent::StepComplete { step_id: format!("{}-{}", self.assistant_message_id, self.current_step_index), usage: relay_protocol::Usage::default(), duration_ms, finish_reason: finish_reason.to_string() },
        )
        .await;
        self.current_step_index += 1;
        Ok(())
    }

    async fn finish_complete(&self, usage: Option<relay_protocol::Usage>, finish_reason: Option<String>) -> Result<()> {
        self.engine.session_store.update_message_status(&self.assistant_message_id, MessageStatus::Completed, usage, finish_reason.clone()).await.context(StoreSnafu)?;
        emit(&self.engine.event_bus, &self.session_id, StreamEvent::MessageStatusUpdated { message_id: self.assistant_message_id.clone(), status: MessageStatus::Completed, usage, finish_reason: finish_reason.clone() }).await;
        emit(&self.engine.event_bus, &self.session_id, StreamEvent::Complete { usage, finish_reason }).await;
        Ok(())
    }

    /// Step 7: cancellation. Whatever text/reasoning was buffered is
    /// flushed so §8 property S4 ("all up-to-cancellation deltas
    /// preserved") holds; an in-flight tool call is left `active` — its
    /// `ToolContext::cancel` token has already fired, so a well-behaved
    /// tool implementation observes it and returns promptly.
    async fn finish_abort(&mut self, active: Option<ActiveStep>) -> Result<()> {
        match active {
            Some(ActiveStep::Text(text)) if !text.is_empty() => {
                let part = Part::Text { content: text, status: PartStatus::Active };
                self.engine.session_store.append_step(&self.assistant_message_id, self.current_step_index, vec![part]).await.context(StoreSnafu)?;
            }
            Some(ActiveStep::Reasoning { text, start_time }) if !text.is_empty() => {
                let part = Part::Reasoning { content: text, status: PartStatus::Active, start_time, end_time: None, duration_ms: None };
                self.engine.session_store.append_step(&self.assistant_message_id, self.current_step_index, vec![part]).await.context(StoreSnafu)?;
            }
            _ => {}
        }
        self.engine.session_store.update_message_status(&self.assistant_message_id, MessageStatus::Abort, None, None).await.context(StoreSnafu)?;
        emit(&self.engine.event_bus, &self.session_id, StreamEvent::MessageStatusUpdated { message_id: self.assistant_message_id.clone(), status: MessageStatus::Abort, usage: None, finish_reason: None }).await;
        emit(&self.engine.event_bus, &self.session_id, StreamEvent::Abort).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine.test.rs"]
mod tests;
