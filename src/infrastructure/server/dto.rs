use crate::domain::types::UiMessage;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One exchange request: the client's full accumulated conversation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatExchangeRequest {
    pub messages: Vec<UiMessage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
