use crate::application::orchestrator::Orchestrator;
use crate::infrastructure::model::ModelProvider;
use std::time::Duration;

pub(crate) struct ServerState<P: ModelProvider> {
    orchestrator: Orchestrator<P>,
    exchange_timeout: Duration,
}

impl<P: ModelProvider> ServerState<P> {
    pub(crate) fn new(orchestrator: Orchestrator<P>, exchange_timeout: Duration) -> Self {
        Self {
            orchestrator,
            exchange_timeout,
        }
    }

    pub(crate) fn orchestrator(&self) -> &Orchestrator<P> {
        &self.orchestrator
    }

    pub(crate) fn exchange_timeout(&self) -> Duration {
        self.exchange_timeout
    }
}
