//! MeshLink Common Types
//!
//! Shared wire types used by the gateway client and the verifier binary.

pub mod agent;
pub mod chat;
pub mod event;

pub use agent::{AgentRecord, RegisterAgentRequest, RegisterAgentResponse};
pub use chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, Usage};
pub use event::{MeshEvent, MESH_STATUS};
