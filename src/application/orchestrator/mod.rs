mod errors;
mod models;
mod runner;


pub use errors::ExchangeError;
pub use models::{
    DEFAULT_MAX_TOOL_STEPS, ExchangeOptions, ExchangeOutcome, ExchangePhase, StreamUpdate, ToolStep,
};
pub use runner::{Exchange, Orchestrator};
