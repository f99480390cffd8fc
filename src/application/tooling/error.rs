use super::schema::{FieldFault, join_faults};
use serde_json::{Value, json};
use thiserror::Error;

/// Failure inside a tool executor.
#[derive(Debug, Error)]
pub enum ToolInvokeError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("rate provider returned an unusable payload: {0}")]
    InvalidPayload(String),
    #[error("no credential configured for {provider}")]
    MissingCredential { provider: &'static str },
}

/// Failure of one tool invocation as seen by the dispatch loop.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error("invalid input for tool '{tool}': {}", join_faults(.faults))]
    Validation {
        tool: String,
        faults: Vec<FieldFault>,
    },
    #[error("failed to execute tool '{tool}': {source}")]
    Execution {
        tool: String,
        #[source]
        source: ToolInvokeError,
    },
}

impl ToolError {
    /// The structured failure record folded back into the conversation so
    /// the model can react instead of the exchange aborting.
    pub fn failure_payload(&self) -> Value {
        match self {
            ToolError::UnknownTool(name) => json!({
                "error": {
                    "kind": "unknown-tool",
                    "message": format!("no tool named '{name}' is available"),
                }
            }),
            ToolError::Validation { faults, .. } => json!({
                "error": {
                    "kind": "validation",
                    "message": "input failed schema validation",
                    "fields": faults
                        .iter()
                        .map(|fault| json!({"field": fault.field, "reason": fault.reason}))
                        .collect::<Vec<_>>(),
                }
            }),
            ToolError::Execution { source, .. } => json!({
                "error": {
                    "kind": "execution",
                    "message": source.to_string(),
                }
            }),
        }
    }
}
