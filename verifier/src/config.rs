//! Configuration for the verifier.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use meshlink_client::GatewayConfig;
use serde::Deserialize;

/// Main configuration structure for the verifier.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Display name used at registration.
    #[serde(default = "default_agent_name")]
    pub name: String,
    /// Model requested for the chat exchange.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListenerConfig {
    /// Cancel the event wait after this many seconds. Unset waits forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_agent_name() -> String {
    "meshlink-probe".to_string()
}
fn default_model() -> String {
    "Llama-3-70b".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (MESHLINK__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("MESHLINK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
