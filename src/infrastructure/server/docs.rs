use super::dto::{ChatExchangeRequest, ErrorResponse};
use super::routes;
use crate::application::orchestrator::{StreamUpdate, ToolStep};
use crate::domain::types::{Part, UiMessage};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(routes::chat::chat_handler),
    components(
        schemas(
            ChatExchangeRequest,
            ErrorResponse,
            UiMessage,
            Part,
            StreamUpdate,
            ToolStep
        )
    ),
    tags(
        (name = "chat", description = "Streaming claims-intake exchanges")
    )
)]
pub(super) struct ApiDoc;
