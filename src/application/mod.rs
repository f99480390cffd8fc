pub mod bridge;
pub mod orchestrator;
pub mod tooling;
