// End-to-end exchange tests against the public API: a scripted provider
// stands in for the model endpoint, the real registry resolves the calls.

use async_trait::async_trait;
use futures::StreamExt;
use livia_gateway::application::orchestrator::{
    ExchangeOptions, Orchestrator, StreamUpdate,
};
use livia_gateway::application::tooling::ToolRegistry;
use livia_gateway::domain::types::{Part, UiMessage};
use livia_gateway::infrastructure::model::{
    ModelError, ModelEventStream, ModelProvider, ModelRequest, StreamEvent,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

struct ScriptedProvider {
    turns: Mutex<VecDeque<Vec<StreamEvent>>>,
}

impl ScriptedProvider {
    fn new(turns: Vec<Vec<StreamEvent>>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn stream_chat(&self, _request: ModelRequest) -> Result<ModelEventStream, ModelError> {
        let turn = self.turns.lock().await.pop_front().unwrap_or_default();
        Ok(futures::stream::iter(turn.into_iter().map(Ok)).boxed())
    }
}

fn gateway(provider: ScriptedProvider) -> Orchestrator<ScriptedProvider> {
    let registry = Arc::new(ToolRegistry::standard(
        reqwest::Client::new(),
        "https://rates.invalid",
        None,
    ));
    Orchestrator::new(
        Arc::new(provider),
        registry,
        ExchangeOptions::new("gpt-4o", "You are a claims-intake assistant."),
    )
}

#[tokio::test]
async fn weather_conversation_produces_paired_call_and_result_then_text() {
    let provider = ScriptedProvider::new(vec![
        vec![
            StreamEvent::ToolCallStart {
                index: 0,
                id: "call_weather_1".into(),
                name: "weather".into(),
            },
            StreamEvent::ToolCallDelta {
                index: 0,
                arguments: "{\"location\":\"Austin\"}".into(),
            },
            StreamEvent::Finished {
                reason: Some("tool_calls".into()),
            },
        ],
        vec![
            StreamEvent::TextDelta("It's a warm day in Austin.".into()),
            StreamEvent::Finished {
                reason: Some("stop".into()),
            },
        ],
    ]);
    let orchestrator = gateway(provider);

    let history = vec![UiMessage::user(vec![Part::text(
        "What's the weather in Austin?",
    )])];
    let mut exchange = orchestrator.prepare(&history).expect("history converts");
    let (tx, mut rx) = mpsc::channel(64);
    let outcome = exchange.run(tx).await.expect("exchange completes");

    // The tool-call part's id matches the following tool-result part's id,
    // and the final assistant turn closes with text.
    let parts = &outcome.reply.parts;
    let call_id = parts.iter().find_map(|part| match part {
        Part::ToolCall { tool_call_id, .. } => Some(tool_call_id.clone()),
        _ => None,
    });
    let result_id = parts.iter().find_map(|part| match part {
        Part::ToolResult { tool_call_id, .. } => Some(tool_call_id.clone()),
        _ => None,
    });
    assert_eq!(call_id.as_deref(), Some("call_weather_1"));
    assert_eq!(call_id, result_id);
    assert!(matches!(
        parts.last(),
        Some(Part::Text { text }) if text == "It's a warm day in Austin."
    ));

    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    assert!(matches!(updates.first(), Some(StreamUpdate::ToolCall { .. })));
    assert_eq!(updates.last(), Some(&StreamUpdate::Finish));
}

#[tokio::test]
async fn unit_conversion_round_resolves_with_exact_arithmetic() {
    let provider = ScriptedProvider::new(vec![
        vec![
            StreamEvent::ToolCallStart {
                index: 0,
                id: "call_convert_1".into(),
                name: "convertFahrenheitToCelsius".into(),
            },
            StreamEvent::ToolCallDelta {
                index: 0,
                arguments: "{\"temperature\":212}".into(),
            },
            StreamEvent::Finished {
                reason: Some("tool_calls".into()),
            },
        ],
        vec![
            StreamEvent::TextDelta("That's 100°C.".into()),
            StreamEvent::Finished {
                reason: Some("stop".into()),
            },
        ],
    ]);
    let orchestrator = gateway(provider);

    let history = vec![UiMessage::user(vec![Part::text("212F in celsius?")])];
    let mut exchange = orchestrator.prepare(&history).expect("history converts");
    let (tx, _rx) = mpsc::channel(64);
    let outcome = exchange.run(tx).await.expect("exchange completes");

    assert_eq!(outcome.steps.len(), 1);
    assert!(outcome.steps[0].success);
    assert_eq!(outcome.steps[0].output["celsius"], 100);
}
