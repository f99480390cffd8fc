// Config loading tests - AppConfig::load defaults and error handling.

use livia_gateway::config::{AppConfig, ConfigError};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("client.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

#[test]
fn returns_error_when_named_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/client.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn empty_file_falls_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "");

    let config = AppConfig::load(Some(&path)).expect("empty config loads");
    assert_eq!(config.provider.id, "openai");
    assert_eq!(config.provider.model, "gpt-4o");
    assert_eq!(config.provider.api_path, "/v1/chat/completions");
    assert_eq!(config.provider.api_key.as_deref(), Some("OPENAI_API_KEY"));
    assert_eq!(config.currency.api_key.as_deref(), Some("EXCHANGERATE_API_KEY"));
    assert_eq!(config.exchange.max_tool_steps, 5);
    assert_eq!(config.exchange.timeout_secs, 30);
    assert_eq!(config.server.addr.port(), 8080);
    assert!(config.system_prompt.is_none());
}

#[test]
fn file_values_override_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
system_prompt = "You are a terse adjuster."

[provider]
id = "groq"
endpoint = "https://api.groq.com/openai"
model = "llama-3.3-70b-versatile"
api_key = "GROQ_API_KEY"

[exchange]
max_tool_steps = 3
timeout_secs = 10

[server]
addr = "0.0.0.0:9090"
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("config loads");
    assert_eq!(config.system_prompt.as_deref(), Some("You are a terse adjuster."));
    assert_eq!(config.provider.id, "groq");
    assert_eq!(config.provider.model, "llama-3.3-70b-versatile");
    assert_eq!(config.provider.api_key.as_deref(), Some("GROQ_API_KEY"));
    assert_eq!(config.exchange.max_tool_steps, 3);
    assert_eq!(config.exchange.timeout_secs, 10);
    assert_eq!(config.server.addr.port(), 9090);
    // Untouched sections keep their defaults.
    assert_eq!(config.currency.endpoint, "https://v6.exchangerate-api.com");
}

#[test]
fn returns_error_when_addr_is_unparseable() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[server]
addr = "not-an-address"
"#,
    );

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::InvalidAddr { .. })));
}

#[test]
fn returns_error_when_tool_steps_is_zero() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[exchange]
max_tool_steps = 0
"#,
    );

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::ZeroToolSteps)));
}

#[test]
fn returns_error_when_toml_is_malformed() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[provider\nid = ");

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
