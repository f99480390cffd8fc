mod openai;
mod traits;
mod types;

pub use openai::OpenAIClient;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelEventStream, ModelRequest, StreamEvent};
