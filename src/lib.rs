pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{bridge, orchestrator, tooling};
pub use cli::Cli;
pub use config::AppConfig;
pub use domain::types;
pub use infrastructure::{model, server};
