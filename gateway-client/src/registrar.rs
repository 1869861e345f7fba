//! Agent registration against the gateway.

use std::time::Duration;

use reqwest::Client;

use meshlink_common::{AgentRecord, RegisterAgentRequest, RegisterAgentResponse};

use crate::config::GatewayConfig;
use crate::error::{Error, Result};

/// Performs the one-time registration call and registry lookups.
pub struct Registrar {
    http_client: Client,
    config: GatewayConfig,
    timeout: Duration,
}

/// Identifier and credential issued at registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub agent_id: String,
    pub api_key: String,
}

impl Registrar {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http_client: Client::new(),
            config: config.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Register an agent under `display_name` and return the issued identity
    /// and credential.
    ///
    /// An empty display name is rejected before any network I/O. A response
    /// with an empty `agent_id` or `api_key` is a protocol error; success is
    /// never partially populated.
    pub async fn register(&self, display_name: &str) -> Result<Registration> {
        if display_name.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "display name must not be empty".to_string(),
            ));
        }

        let url = self.config.register_url();
        tracing::debug!("Registering agent '{}' at {}", display_name, url);

        let response = self
            .http_client
            .post(&url)
            .timeout(self.timeout)
            .json(&RegisterAgentRequest {
                name: display_name.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }

        let decoded: RegisterAgentResponse = response.json().await?;
        if decoded.agent_id.is_empty() || decoded.api_key.is_empty() {
            return Err(Error::Protocol(
                "registration response has empty agent_id or api_key".to_string(),
            ));
        }

        tracing::info!(
            "Registered agent {} with key {}",
            decoded.agent_id,
            decoded.api_key
        );

        Ok(Registration {
            agent_id: decoded.agent_id,
            api_key: decoded.api_key,
        })
    }

    /// Fetch the gateway's agent registry listing.
    pub async fn list(&self) -> Result<Vec<AgentRecord>> {
        let response = self
            .http_client
            .get(self.config.agents_url())
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Check that the gateway answers its health endpoint.
    pub async fn health(&self) -> Result<()> {
        let response = self
            .http_client
            .get(self.config.health_url())
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> GatewayConfig {
        GatewayConfig {
            base_url,
            request_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_register_returns_identity_and_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/agents/register"))
            .and(body_json(json!({"name": "X"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"agent_id": "a1", "api_key": "k1"})),
            )
            .mount(&server)
            .await;

        let registrar = Registrar::new(&test_config(server.uri()));
        let registration = registrar.register("X").await.unwrap();
        assert_eq!(registration.agent_id, "a1");
        assert_eq!(registration.api_key, "k1");
    }

    #[tokio::test]
    async fn test_register_rejects_empty_name_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/agents/register"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let registrar = Registrar::new(&test_config(server.uri()));
        let err = registrar.register("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_register_missing_field_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/agents/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"agent_id": "a1"})))
            .mount(&server)
            .await;

        let registrar = Registrar::new(&test_config(server.uri()));
        let err = registrar.register("X").await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn test_register_empty_credential_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/agents/register"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"agent_id": "a1", "api_key": ""})),
            )
            .mount(&server)
            .await;

        let registrar = Registrar::new(&test_config(server.uri()));
        let err = registrar.register("X").await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn test_register_server_error_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/agents/register"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let registrar = Registrar::new(&test_config(server.uri()));
        let err = registrar.register("X").await.unwrap_err();
        match err {
            Error::Protocol(msg) => assert!(msg.contains("500")),
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_connection_refused_is_transport_error() {
        // Port 1 is never listening.
        let registrar = Registrar::new(&test_config("http://127.0.0.1:1".to_string()));
        let err = registrar.register("X").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_list_returns_registry_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/agents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "a1", "name": "probe", "permissions": ["compute"]}
            ])))
            .mount(&server)
            .await;

        let registrar = Registrar::new(&test_config(server.uri()));
        let agents = registrar.list().await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id, "a1");
    }

    #[tokio::test]
    async fn test_health_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&server)
            .await;

        let registrar = Registrar::new(&test_config(server.uri()));
        assert!(registrar.health().await.is_ok());
    }

    #[tokio::test]
    async fn test_health_failure_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let registrar = Registrar::new(&test_config(server.uri()));
        let err = registrar.health().await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }
}
