use super::super::dto::{ChatExchangeRequest, ErrorResponse};
use super::super::state::ServerState;
use crate::application::bridge;
use crate::application::orchestrator::{Exchange, ExchangeError, StreamUpdate};
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};

#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = ChatExchangeRequest,
    responses(
        (status = 200, description = "Exchange streamed as Server-Sent Events"),
        (status = 400, description = "Empty message history", body = ErrorResponse),
        (status = 422, description = "Malformed message shape", body = ErrorResponse)
    )
)]
pub async fn chat_handler<P: ModelProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
    Json(payload): Json<ChatExchangeRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, Json<ErrorResponse>)> {
    info!(messages = payload.messages.len(), "Received /chat request");
    debug!(
        history = ?bridge::redact_for_logging(&payload.messages),
        "Exchange history received"
    );

    if payload.messages.is_empty() {
        error!("Rejecting /chat request with an empty message history");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "message history cannot be empty".to_string(),
            }),
        ));
    }

    let exchange = state.orchestrator().prepare(&payload.messages).map_err(|err| {
        error!(%err, "Rejecting /chat request with a malformed history");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
    })?;

    let (tx, rx) = mpsc::channel::<StreamUpdate>(32);
    tokio::spawn(run_exchange(exchange, tx, state.exchange_timeout()));

    let stream = ReceiverStream::new(rx).map(|update| Ok(to_sse_event(&update)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Drives one exchange under the wall-clock bound. On the deadline the
/// exchange future is dropped; whatever third-party call was in flight has
/// its result discarded.
pub(crate) async fn run_exchange<P: ModelProvider>(
    mut exchange: Exchange<P>,
    updates: mpsc::Sender<StreamUpdate>,
    deadline: Duration,
) {
    match tokio::time::timeout(deadline, exchange.run(updates.clone())).await {
        Ok(Ok(outcome)) => {
            debug!(
                parts = outcome.reply.parts.len(),
                steps = outcome.steps.len(),
                "Exchange streamed to completion"
            );
        }
        Ok(Err(ExchangeError::Abandoned)) => {
            debug!("Client abandoned the exchange");
        }
        Ok(Err(err)) => {
            error!(%err, "Exchange failed");
            let _ = updates
                .send(StreamUpdate::error(err.kind(), err.to_string()))
                .await;
        }
        Err(_) => {
            error!(
                deadline_secs = deadline.as_secs(),
                "Exchange exceeded the wall-clock bound"
            );
            let _ = updates
                .send(StreamUpdate::error(
                    "timeout",
                    format!(
                        "exchange exceeded the {}s wall-clock bound",
                        deadline.as_secs()
                    ),
                ))
                .await;
        }
    }
}

fn to_sse_event(update: &StreamUpdate) -> Event {
    Event::default()
        .json_data(update)
        .unwrap_or_else(|_| Event::default().data("{}"))
}
