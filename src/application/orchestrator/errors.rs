use crate::infrastructure::model::ModelError;
use thiserror::Error;

/// Fatal exchange failures. Tool validation and execution failures are not
/// represented here: those are folded back into the conversation as
/// failure-carrying tool results.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("exchange exceeded {limit} sequential tool steps")]
    StepsExhausted { limit: usize },
    #[error("client abandoned the exchange")]
    Abandoned,
}

impl ExchangeError {
    /// Stable discriminator published with terminal error updates.
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::Model(_) => "transport",
            ExchangeError::StepsExhausted { .. } => "tool-steps",
            ExchangeError::Abandoned => "abandoned",
        }
    }
}
