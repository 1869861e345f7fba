//! Gateway endpoint configuration.

use serde::Deserialize;

/// Connection settings for one gateway.
///
/// Passed explicitly into each component constructor; nothing here is
/// process-global.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// HTTP base URL of the gateway, e.g. `http://localhost:8080`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout applied to each HTTP request. The event stream wait is not
    /// bounded here; it is governed by the listener's cancellation token.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_request_timeout() -> u64 {
    30
}

impl GatewayConfig {
    fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn register_url(&self) -> String {
        format!("{}/v1/agents/register", self.api_base())
    }

    pub fn agents_url(&self) -> String {
        format!("{}/v1/agents", self.api_base())
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base())
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.api_base())
    }

    /// WebSocket URL of the event stream, derived from the HTTP base URL.
    pub fn events_url(&self) -> String {
        let base = self.api_base();
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}/v1/events", ws_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_endpoint_urls() {
        let config = GatewayConfig {
            base_url: "http://gateway:8080".to_string(),
            ..GatewayConfig::default()
        };
        assert_eq!(config.register_url(), "http://gateway:8080/v1/agents/register");
        assert_eq!(config.agents_url(), "http://gateway:8080/v1/agents");
        assert_eq!(
            config.completions_url(),
            "http://gateway:8080/v1/chat/completions"
        );
        assert_eq!(config.health_url(), "http://gateway:8080/health");
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = GatewayConfig {
            base_url: "http://gateway:8080/".to_string(),
            ..GatewayConfig::default()
        };
        assert_eq!(config.register_url(), "http://gateway:8080/v1/agents/register");
    }

    #[test]
    fn test_events_url_scheme_mapping() {
        let config = GatewayConfig {
            base_url: "http://gateway:8080".to_string(),
            ..GatewayConfig::default()
        };
        assert_eq!(config.events_url(), "ws://gateway:8080/v1/events");

        let config = GatewayConfig {
            base_url: "https://gateway.example.com".to_string(),
            ..GatewayConfig::default()
        };
        assert_eq!(config.events_url(), "wss://gateway.example.com/v1/events");
    }

    #[test]
    fn test_deserialization_fills_defaults() {
        let config: GatewayConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_secs, 30);
    }
}
