use super::errors::ExchangeError;
use super::models::{ExchangeOptions, ExchangeOutcome, ExchangePhase, StreamUpdate, ToolStep};
use crate::application::bridge::{self, BridgeError};
use crate::application::tooling::ToolRegistry;
use crate::domain::types::{AssistantToolCall, ModelMessage, Part, UiMessage};
use crate::infrastructure::model::{ModelProvider, ModelRequest, StreamEvent};
use futures::StreamExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Builds exchanges: one per inbound request, each carrying its own
/// conversation state. The orchestrator itself is immutable and shared.
pub struct Orchestrator<P: ModelProvider> {
    provider: Arc<P>,
    registry: Arc<ToolRegistry>,
    options: ExchangeOptions,
}

impl<P: ModelProvider> Clone for Orchestrator<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            registry: self.registry.clone(),
            options: self.options.clone(),
        }
    }
}

impl<P: ModelProvider> Orchestrator<P> {
    pub fn new(provider: Arc<P>, registry: Arc<ToolRegistry>, options: ExchangeOptions) -> Self {
        Self {
            provider,
            registry,
            options,
        }
    }

    /// Converts the client history into wire form, rejecting malformed
    /// shapes before anything is streamed.
    pub fn prepare(&self, history: &[UiMessage]) -> Result<Exchange<P>, BridgeError> {
        let mut conversation = Vec::with_capacity(history.len() + 1);
        conversation.push(ModelMessage::system(self.options.system_prompt.clone()));
        conversation.extend(bridge::to_model_messages(history)?);
        Ok(Exchange {
            provider: self.provider.clone(),
            registry: self.registry.clone(),
            options: self.options.clone(),
            conversation,
            phase: ExchangePhase::Idle,
        })
    }
}

/// One in-flight exchange, driven to a terminal phase by [`Exchange::run`].
pub struct Exchange<P: ModelProvider> {
    provider: Arc<P>,
    registry: Arc<ToolRegistry>,
    options: ExchangeOptions,
    conversation: Vec<ModelMessage>,
    phase: ExchangePhase,
}

struct PendingCall {
    index: u32,
    id: String,
    name: String,
    arguments: String,
}

impl<P: ModelProvider> Exchange<P> {
    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    fn transition(&mut self, next: ExchangePhase) {
        if self.phase != next {
            debug!(from = self.phase.as_str(), to = next.as_str(), "Exchange phase");
            self.phase = next;
        }
    }

    async fn emit(
        &mut self,
        updates: &mpsc::Sender<StreamUpdate>,
        update: StreamUpdate,
    ) -> Result<(), ExchangeError> {
        if updates.send(update).await.is_err() {
            debug!("Update receiver dropped; abandoning exchange");
            self.transition(ExchangePhase::Failed);
            return Err(ExchangeError::Abandoned);
        }
        Ok(())
    }

    /// Drives the exchange to a terminal phase, publishing updates as they
    /// are produced. Tool dispatch is sequential: the model sees each
    /// result before it can request another call.
    pub async fn run(
        &mut self,
        updates: mpsc::Sender<StreamUpdate>,
    ) -> Result<ExchangeOutcome, ExchangeError> {
        info!(
            messages = self.conversation.len(),
            tools = self.registry.len(),
            "Exchange started"
        );
        let declarations = self.registry.declarations();
        let mut reply_parts: Vec<Part> = Vec::new();
        let mut steps: Vec<ToolStep> = Vec::new();
        let mut remaining_steps = self.options.max_tool_steps;

        loop {
            self.transition(ExchangePhase::RequestSent);
            let request = ModelRequest {
                model: self.options.model.clone(),
                messages: self.conversation.clone(),
                tools: declarations.clone(),
            };

            let mut stream = match self.provider.stream_chat(request).await {
                Ok(stream) => stream,
                Err(err) => {
                    self.transition(ExchangePhase::Failed);
                    return Err(err.into());
                }
            };

            let mut text = String::new();
            let mut pending: Vec<PendingCall> = Vec::new();
            while let Some(event) = stream.next().await {
                match event {
                    Ok(StreamEvent::TextDelta(delta)) => {
                        self.transition(ExchangePhase::StreamingText);
                        text.push_str(&delta);
                        self.emit(&updates, StreamUpdate::TextDelta { delta }).await?;
                    }
                    Ok(StreamEvent::ToolCallStart { index, id, name }) => {
                        self.transition(ExchangePhase::AwaitingTool);
                        pending.push(PendingCall {
                            index,
                            id,
                            name,
                            arguments: String::new(),
                        });
                    }
                    Ok(StreamEvent::ToolCallDelta { index, arguments }) => {
                        if let Some(call) = pending.iter_mut().find(|call| call.index == index) {
                            call.arguments.push_str(&arguments);
                        }
                    }
                    Ok(StreamEvent::Finished { .. }) => break,
                    Err(err) => {
                        self.transition(ExchangePhase::Failed);
                        return Err(err.into());
                    }
                }
            }

            if !text.is_empty() {
                reply_parts.push(Part::text(text.clone()));
            }

            if pending.is_empty() {
                self.conversation.push(ModelMessage::assistant_text(text));
                self.transition(ExchangePhase::Complete);
                self.emit(&updates, StreamUpdate::Finish).await?;
                info!(steps = steps.len(), "Exchange complete");
                return Ok(ExchangeOutcome {
                    reply: UiMessage::assistant(reply_parts),
                    steps,
                });
            }

            if remaining_steps == 0 {
                warn!(
                    limit = self.options.max_tool_steps,
                    "Exchange still requesting tools at the step bound"
                );
                self.transition(ExchangePhase::Failed);
                return Err(ExchangeError::StepsExhausted {
                    limit: self.options.max_tool_steps,
                });
            }
            remaining_steps -= 1;

            pending.sort_by_key(|call| call.index);
            let calls: Vec<AssistantToolCall> = pending
                .iter()
                .map(|call| {
                    AssistantToolCall::function(
                        call.id.clone(),
                        call.name.clone(),
                        call.arguments.clone(),
                    )
                })
                .collect();
            self.conversation
                .push(ModelMessage::assistant_with_calls(text, calls));

            for call in pending {
                self.transition(ExchangePhase::Dispatching);
                let input = parse_arguments(&call.arguments);
                info!(tool = call.name.as_str(), "Model requested tool execution");

                self.emit(
                    &updates,
                    StreamUpdate::ToolCall {
                        tool_call_id: call.id.clone(),
                        tool_name: call.name.clone(),
                        input: input.clone(),
                    },
                )
                .await?;
                reply_parts.push(Part::ToolCall {
                    tool_name: call.name.clone(),
                    tool_call_id: call.id.clone(),
                    input: input.clone(),
                });

                // Validation and execution failures stay scoped to this
                // invocation: the model gets the failure record and decides
                // how to react.
                let (success, output) = match self.registry.execute(&call.name, input.clone()).await
                {
                    Ok(output) => (true, output),
                    Err(err) => (false, err.failure_payload()),
                };

                steps.push(ToolStep {
                    tool: call.name.clone(),
                    input,
                    success,
                    output: output.clone(),
                });
                self.emit(
                    &updates,
                    StreamUpdate::ToolResult {
                        tool_call_id: call.id.clone(),
                        output: output.clone(),
                    },
                )
                .await?;
                reply_parts.push(Part::ToolResult {
                    tool_call_id: call.id.clone(),
                    output: output.clone(),
                });

                self.conversation
                    .push(ModelMessage::tool(call.id, output.to_string()));
            }
        }
    }
}

/// The model streams arguments as raw JSON text. Anything undecodable is
/// kept as a string so schema validation can report it back to the model.
fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
