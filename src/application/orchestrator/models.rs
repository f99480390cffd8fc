use crate::domain::types::UiMessage;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

pub const DEFAULT_MAX_TOOL_STEPS: usize = 5;

/// Phases of one exchange. `Complete` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Idle,
    RequestSent,
    StreamingText,
    AwaitingTool,
    Dispatching,
    Complete,
    Failed,
}

impl ExchangePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangePhase::Idle => "idle",
            ExchangePhase::RequestSent => "request-sent",
            ExchangePhase::StreamingText => "streaming-text",
            ExchangePhase::AwaitingTool => "awaiting-tool",
            ExchangePhase::Dispatching => "dispatching",
            ExchangePhase::Complete => "complete",
            ExchangePhase::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ExchangePhase::Complete | ExchangePhase::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeOptions {
    pub model: String,
    pub system_prompt: String,
    /// Maximum number of sequential tool-augmented model turns before the
    /// exchange is cut off.
    pub max_tool_steps: usize,
}

impl ExchangeOptions {
    pub fn new(model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            max_tool_steps: DEFAULT_MAX_TOOL_STEPS,
        }
    }

    pub fn with_max_tool_steps(mut self, max_tool_steps: usize) -> Self {
        self.max_tool_steps = max_tool_steps;
        self
    }
}

/// One incremental update published to the client while an exchange runs.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum StreamUpdate {
    TextDelta {
        delta: String,
    },
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        #[schema(value_type = Object)]
        input: Value,
    },
    ToolResult {
        tool_call_id: String,
        #[schema(value_type = Object)]
        output: Value,
    },
    Finish,
    Error {
        kind: String,
        message: String,
    },
}

impl StreamUpdate {
    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        StreamUpdate::Error {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Record of one resolved tool invocation within an exchange.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolStep {
    pub tool: String,
    #[schema(value_type = Object)]
    pub input: Value,
    pub success: bool,
    #[schema(value_type = Object)]
    pub output: Value,
}

/// Final value of a completed exchange: the assembled assistant turn and
/// the tool invocations that fed it.
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub reply: UiMessage,
    pub steps: Vec<ToolStep>,
}
