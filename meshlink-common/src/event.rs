//! Mesh event objects pushed over the gateway's WebSocket stream.
//!
//! Events are JSON objects of unconstrained shape. The only field the client
//! interprets is `type`; everything else rides along in `payload` untouched,
//! so encoding an event again reproduces the original object.

use serde::{Deserialize, Serialize};

/// The event type that terminates a verification wait.
pub const MESH_STATUS: &str = "mesh_status";

/// A single event from the gateway's push stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshEvent {
    /// Discriminator field. Absent on events that carry no `type` key.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// All remaining fields of the event object.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl MeshEvent {
    /// Whether this is the `mesh_status` event the listener waits for.
    pub fn is_mesh_status(&self) -> bool {
        self.event_type.as_deref() == Some(MESH_STATUS)
    }
}

impl std::fmt::Display for MeshEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}
