use super::docs::ApiDoc;
use super::error::ServerError;
use super::routes;
use super::state::ServerState;
use crate::application::orchestrator::Orchestrator;
use crate::infrastructure::model::ModelProvider;
use axum::Router;
use axum::http::Method;
use axum::routing::post;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(super) async fn serve<P>(
    orchestrator: Orchestrator<P>,
    exchange_timeout: Duration,
    addr: SocketAddr,
) -> Result<(), ServerError>
where
    P: ModelProvider + 'static,
{
    let api = ApiDoc::openapi();
    info!(%addr, "Binding gateway server");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let state = Arc::new(ServerState::new(orchestrator, exchange_timeout));
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", api))
        .route("/chat", post(routes::chat::chat_handler::<P>))
        .layer(cors)
        .with_state(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "Gateway ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}
