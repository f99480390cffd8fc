use super::types::{ModelError, ModelEventStream, ModelRequest};
use async_trait::async_trait;

/// A chat-completion backend capable of streamed, tool-aware inference.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Opens one streamed completion for the given request. Transport-level
    /// failures may surface either here or as the stream's error items.
    async fn stream_chat(&self, request: ModelRequest) -> Result<ModelEventStream, ModelError>;
}
