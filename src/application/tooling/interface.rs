use super::error::ToolInvokeError;
use super::schema::ToolSchema;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Model-facing declaration of one callable tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A named, schema-validated function the model may request during an
/// exchange. Implementations receive their configuration (HTTP client,
/// credentials) through their constructors; nothing is read from ambient
/// state at execution time.
#[async_trait]
pub trait ClaimsTool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn schema(&self) -> ToolSchema;

    /// Runs the executor. The input has already passed schema validation.
    async fn execute(&self, input: Value) -> Result<Value, ToolInvokeError>;

    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.schema().parameters(),
        }
    }
}
