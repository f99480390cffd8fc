mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use dto::{ChatExchangeRequest, ErrorResponse};
pub use error::ServerError;

use crate::application::orchestrator::Orchestrator;
use crate::infrastructure::model::ModelProvider;
use std::net::SocketAddr;
use std::time::Duration;

pub async fn serve<P>(
    orchestrator: Orchestrator<P>,
    exchange_timeout: Duration,
    addr: SocketAddr,
) -> Result<(), ServerError>
where
    P: ModelProvider + 'static,
{
    router::serve(orchestrator, exchange_timeout, addr).await
}
