use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(
    name = "livia-gateway",
    version,
    about = "Streaming claims-intake chat gateway"
)]
pub struct Cli {
    /// Configuration file path (defaults to config/client.toml)
    #[arg(long)]
    pub config: Option<String>,
    /// Listen address override
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// System prompt override
    #[arg(long)]
    pub system: Option<String>,
}
