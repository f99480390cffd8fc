use clap::Parser;
use livia_gateway::application::orchestrator::{ExchangeOptions, Orchestrator};
use livia_gateway::application::tooling::ToolRegistry;
use livia_gateway::cli::Cli;
use livia_gateway::config::{self, AppConfig, DEFAULT_SYSTEM_PROMPT};
use livia_gateway::infrastructure::model::OpenAIClient;
use livia_gateway::infrastructure::server;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    info!("Starting livia-gateway");
    let cli = Cli::parse();
    debug!(config = ?cli.config, addr = ?cli.addr, "CLI arguments parsed");

    let config_path = cli.config.as_deref().map(Path::new);
    let mut config = AppConfig::load(config_path)?;
    if let Some(path) = config_path {
        info!(path = %path.display(), "Loaded configuration from file");
    } else {
        info!("Loaded configuration using default path or defaults");
    }
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }
    if let Some(system) = cli.system {
        config.system_prompt = Some(system);
    }

    let http = reqwest::Client::new();

    let provider_key =
        config::resolve_api_key(&config.provider.id, config.provider.api_key.as_deref());
    let provider = Arc::new(OpenAIClient::from_config(
        &config.provider,
        provider_key,
        http.clone(),
    ));

    let currency_key =
        config::resolve_api_key("exchangerate-api", config.currency.api_key.as_deref());
    let registry = Arc::new(ToolRegistry::standard(
        http,
        config.currency.endpoint.clone(),
        currency_key,
    ));
    debug!(tools = registry.len(), "Tool registry assembled");

    let options = ExchangeOptions::new(
        config.provider.model.clone(),
        config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.trim().to_string()),
    )
    .with_max_tool_steps(config.exchange.max_tool_steps);
    let orchestrator = Orchestrator::new(provider, registry, options);

    info!(addr = %config.server.addr, "Starting gateway server");
    server::serve(
        orchestrator,
        Duration::from_secs(config.exchange.timeout_secs),
        config.server.addr,
    )
    .await?;
    info!("Gateway execution finished");
    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
