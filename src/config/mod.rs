//! Gateway configuration: a TOML file plus environment-resolved secrets.
//!
//! `api_key` fields name the environment variable holding the credential;
//! the value itself never lives in the file. A missing variable is a
//! startup concern, logged once, not a runtime path.

mod defaults;
mod error;

pub use defaults::*;
pub use error::ConfigError;

use crate::application::orchestrator::DEFAULT_MAX_TOOL_STEPS;
use crate::constants::{CONFIG_PATH, ENV_PATH};
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub system_prompt: Option<String>,
    pub provider: ProviderSettings,
    pub currency: CurrencySettings,
    pub exchange: ExchangeSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub id: String,
    pub endpoint: String,
    pub api_path: String,
    /// Name of the environment variable holding the credential.
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct CurrencySettings {
    pub endpoint: String,
    /// Name of the environment variable holding the credential.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExchangeSettings {
    pub max_tool_steps: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

impl AppConfig {
    /// Loads configuration from the given path, the default path, or the
    /// built-in defaults when no default file exists. An explicitly named
    /// file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::from_path(ENV_PATH);

        match path {
            Some(path) if !path.exists() => Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    debug!(path = %default.display(), "No configuration file; using defaults");
                    RawAppConfig::default().finalize()
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw_text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawAppConfig =
            toml::from_str(&raw_text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        raw.finalize()
    }
}

/// Looks up a credential named by the configuration. Resolution failures
/// are reported once, at startup.
pub fn resolve_api_key(provider: &str, spec: Option<&str>) -> Option<String> {
    let raw = spec.map(str::trim).filter(|name| !name.is_empty())?;
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawAppConfig {
    #[serde(default)]
    system_prompt: Option<String>,
    #[serde(default)]
    provider: RawProviderSettings,
    #[serde(default)]
    currency: RawCurrencySettings,
    #[serde(default)]
    exchange: RawExchangeSettings,
    #[serde(default)]
    server: RawServerSettings,
}

#[derive(Debug, Default, Deserialize)]
struct RawProviderSettings {
    id: Option<String>,
    endpoint: Option<String>,
    api_path: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCurrencySettings {
    endpoint: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawExchangeSettings {
    max_tool_steps: Option<usize>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawServerSettings {
    addr: Option<String>,
}

impl RawAppConfig {
    fn finalize(self) -> Result<AppConfig, ConfigError> {
        let max_tool_steps = self
            .exchange
            .max_tool_steps
            .unwrap_or(DEFAULT_MAX_TOOL_STEPS);
        if max_tool_steps == 0 {
            return Err(ConfigError::ZeroToolSteps);
        }

        let addr_text = self
            .server
            .addr
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let addr: SocketAddr = addr_text
            .parse()
            .map_err(|_| ConfigError::InvalidAddr { addr: addr_text })?;

        Ok(AppConfig {
            system_prompt: self.system_prompt,
            provider: ProviderSettings {
                id: self
                    .provider
                    .id
                    .unwrap_or_else(|| DEFAULT_PROVIDER_ID.to_string()),
                endpoint: self
                    .provider
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_PROVIDER_ENDPOINT.to_string()),
                api_path: self
                    .provider
                    .api_path
                    .unwrap_or_else(|| DEFAULT_PROVIDER_API_PATH.to_string()),
                api_key: Some(
                    self.provider
                        .api_key
                        .unwrap_or_else(|| DEFAULT_PROVIDER_KEY_VAR.to_string()),
                ),
                model: self.provider.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
            currency: CurrencySettings {
                endpoint: self
                    .currency
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_CURRENCY_ENDPOINT.to_string()),
                api_key: Some(
                    self.currency
                        .api_key
                        .unwrap_or_else(|| DEFAULT_CURRENCY_KEY_VAR.to_string()),
                ),
            },
            exchange: ExchangeSettings {
                max_tool_steps,
                timeout_secs: self
                    .exchange
                    .timeout_secs
                    .unwrap_or(DEFAULT_EXCHANGE_TIMEOUT_SECS),
            },
            server: ServerSettings { addr },
        })
    }
}
