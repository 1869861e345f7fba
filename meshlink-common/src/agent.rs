//! Agent registry wire types.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/agents/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAgentRequest {
    pub name: String,
}

/// Response of `POST /v1/agents/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAgentResponse {
    pub agent_id: String,
    pub api_key: String,
}

/// One entry of `GET /v1/agents` - the registry's view of an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_serialization() {
        let req = RegisterAgentRequest {
            name: "probe".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"name":"probe"}"#);
    }

    #[test]
    fn test_register_response_deserialization() {
        let json = r#"{"agent_id": "a1", "api_key": "k1"}"#;
        let resp: RegisterAgentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.agent_id, "a1");
        assert_eq!(resp.api_key, "k1");
    }

    #[test]
    fn test_register_response_ignores_extra_fields() {
        // The gateway may attach more fields; only the two we need matter.
        let json = r#"{"agent_id": "a1", "api_key": "k1", "created_at": "2026-01-01"}"#;
        let resp: RegisterAgentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.agent_id, "a1");
    }

    #[test]
    fn test_register_response_missing_key_is_error() {
        let json = r#"{"agent_id": "a1"}"#;
        assert!(serde_json::from_str::<RegisterAgentResponse>(json).is_err());
    }

    #[test]
    fn test_agent_record_default_permissions() {
        let json = r#"{"id": "a1", "name": "probe"}"#;
        let record: AgentRecord = serde_json::from_str(json).unwrap();
        assert!(record.permissions.is_empty());
    }

    #[test]
    fn test_agent_record_roundtrip() {
        let record = AgentRecord {
            id: "a1".to_string(),
            name: "probe".to_string(),
            permissions: vec!["compute".to_string()],
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: AgentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "a1");
        assert_eq!(parsed.permissions, vec!["compute"]);
    }
}
