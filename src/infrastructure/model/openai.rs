//! OpenAI-compatible streaming client (works with OpenAI, Mistral, Groq,
//! and other chat-completion endpoints).

use super::traits::ModelProvider;
use super::types::{ModelError, ModelEventStream, ModelRequest, StreamEvent};
use crate::application::tooling::ToolDeclaration;
use crate::config::ProviderSettings;
use crate::domain::types::ModelMessage;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OpenAIClient {
    id: String,
    endpoint: String,
    api_path: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl OpenAIClient {
    pub fn from_config(
        config: &ProviderSettings,
        api_key: Option<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            id: config.id.clone(),
            endpoint: config.endpoint.clone(),
            api_path: config.api_path.clone(),
            api_key,
            http,
        }
    }

    fn build_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = self.api_path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.id))
    }
}

#[async_trait]
impl ModelProvider for OpenAIClient {
    fn id(&self) -> &str {
        &self.id
    }

    async fn stream_chat(&self, request: ModelRequest) -> Result<ModelEventStream, ModelError> {
        let url = self.build_url();
        let api_key = self.require_api_key()?.to_string();

        let payload = ChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages,
            tools: request.tools.into_iter().map(WireTool::function).collect(),
            stream: true,
        };

        info!(
            provider = self.id.as_str(),
            model = request.model.as_str(),
            messages = payload.messages.len(),
            tools = payload.tools.len(),
            "Opening completion stream"
        );

        let mut source = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .eventsource()
            .map_err(|err| ModelError::stream(&self.id, err.to_string()))?;

        let (tx, rx) = mpsc::channel(32);
        let provider = self.id.clone();
        tokio::spawn(async move {
            while let Some(event) = source.next().await {
                match event {
                    Ok(Event::Open) => {}
                    Ok(Event::Message(message)) => {
                        if message.data.trim() == "[DONE]" {
                            debug!(provider = provider.as_str(), "Completion stream drained");
                            let _ = tx.send(Ok(StreamEvent::Finished { reason: None })).await;
                            break;
                        }
                        match parse_chunk(&provider, &message.data) {
                            Ok(events) => {
                                for item in events {
                                    if tx.send(Ok(item)).await.is_err() {
                                        source.close();
                                        return;
                                    }
                                }
                            }
                            Err(err) => {
                                let _ = tx.send(Err(err)).await;
                                break;
                            }
                        }
                    }
                    Err(reqwest_eventsource::Error::StreamEnded) => {
                        let _ = tx.send(Ok(StreamEvent::Finished { reason: None })).await;
                        break;
                    }
                    Err(reqwest_eventsource::Error::Transport(source)) => {
                        let _ = tx.send(Err(ModelError::network(&provider, source))).await;
                        break;
                    }
                    Err(err) => {
                        let _ = tx
                            .send(Err(ModelError::stream(&provider, err.to_string())))
                            .await;
                        break;
                    }
                }
            }
            source.close();
        });

        Ok(ReceiverStream::new(rx).boxed())
    }
}

fn parse_chunk(provider: &str, data: &str) -> Result<Vec<StreamEvent>, ModelError> {
    let chunk: ChatCompletionChunk = serde_json::from_str(data).map_err(|err| {
        ModelError::invalid_response(provider, format!("undecodable stream chunk: {err}"))
    })?;

    let mut events = Vec::new();
    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(events);
    };

    if let Some(content) = choice.delta.content {
        if !content.is_empty() {
            events.push(StreamEvent::TextDelta(content));
        }
    }

    for call in choice.delta.tool_calls.unwrap_or_default() {
        let Some(function) = call.function else {
            continue;
        };
        if let Some(name) = function.name {
            // First fragment of a call; endpoints that omit the id get one.
            let id = call
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple()));
            events.push(StreamEvent::ToolCallStart {
                index: call.index,
                id,
                name,
            });
            if let Some(arguments) = function.arguments {
                if !arguments.is_empty() {
                    events.push(StreamEvent::ToolCallDelta {
                        index: call.index,
                        arguments,
                    });
                }
            }
        } else if let Some(arguments) = function.arguments {
            events.push(StreamEvent::ToolCallDelta {
                index: call.index,
                arguments,
            });
        }
    }

    if let Some(reason) = choice.finish_reason {
        events.push(StreamEvent::Finished {
            reason: Some(reason),
        });
    }

    Ok(events)
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ModelMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    stream: bool,
}

#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ToolDeclaration,
}

impl WireTool {
    fn function(declaration: ToolDeclaration) -> Self {
        Self {
            kind: "function",
            function: declaration,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallChunk>>,
}

#[derive(Deserialize)]
struct ToolCallChunk {
    #[serde(default)]
    index: u32,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    function: Option<FunctionChunk>,
}

#[derive(Deserialize)]
struct FunctionChunk {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}
