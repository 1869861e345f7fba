//! In-process scripted gateway.
//!
//! Implements the endpoints the verification client talks to: registration
//! (201 with issued id and key), agent listing, bearer-checked completions,
//! the `/v1/events` WebSocket push stream, and `/health`. Behavior matches
//! the real gateway: a `{"type":"connected"}` greeting frame precedes the
//! scripted events, and an unknown key gets `401 {"error":"Invalid API Key"}`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use meshlink_common::{
    AgentRecord, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, RegisterAgentRequest,
    RegisterAgentResponse,
};

/// Behavior knobs for one scripted gateway instance.
#[derive(Debug, Clone)]
pub struct MockGatewayOptions {
    /// Reply text returned for every completion request.
    pub reply: String,
    /// Raw frames pushed on each `/v1/events` connection after the greeting.
    /// Not required to be valid JSON, so failure paths can be scripted.
    pub event_frames: Vec<String>,
    /// Whether to send the `{"type":"connected"}` greeting frame.
    pub send_greeting: bool,
}

impl Default for MockGatewayOptions {
    fn default() -> Self {
        Self {
            reply: "Request processed by the mesh.".to_string(),
            event_frames: vec![r#"{"type":"mesh_status","ok":true}"#.to_string()],
            send_greeting: true,
        }
    }
}

struct MockState {
    options: MockGatewayOptions,
    /// Issued api_key -> agent record.
    agents: Mutex<HashMap<String, AgentRecord>>,
}

/// Scripted gateway served on an ephemeral local port.
pub struct MockGateway {
    addr: SocketAddr,
}

impl MockGateway {
    /// Bind an ephemeral port and serve the scripted gateway until dropped.
    pub async fn start(options: MockGatewayOptions) -> Self {
        let state = Arc::new(MockState {
            options,
            agents: Mutex::new(HashMap::new()),
        });
        let app = router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/v1/agents/register", post(register_agent))
        .route("/v1/agents", get(list_agents))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/events", get(ws_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn register_agent(
    State(state): State<Arc<MockState>>,
    Json(payload): Json<RegisterAgentRequest>,
) -> impl IntoResponse {
    let agent_id = uuid::Uuid::new_v4().to_string();
    let api_key = format!("sk-mesh-{}", uuid::Uuid::new_v4());

    let record = AgentRecord {
        id: agent_id.clone(),
        name: payload.name,
        permissions: vec!["compute".to_string()],
    };
    state
        .agents
        .lock()
        .unwrap()
        .insert(api_key.clone(), record);

    (
        StatusCode::CREATED,
        Json(RegisterAgentResponse { agent_id, api_key }),
    )
}

async fn list_agents(State(state): State<Arc<MockState>>) -> Json<Vec<AgentRecord>> {
    let agents = state.agents.lock().unwrap();
    Json(agents.values().cloned().collect())
}

async fn chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(payload): Json<ChatCompletionRequest>,
) -> Response {
    let authorized = bearer_token(&headers)
        .map(|key| state.agents.lock().unwrap().contains_key(key))
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Invalid API Key"})),
        )
            .into_response();
    }

    let response = ChatCompletionResponse::new(
        payload.model,
        ChatMessage::assistant(state.options.reply.clone()),
        Some("stop".to_string()),
    )
    .with_usage(0, 0);

    (StatusCode::OK, Json(response)).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<MockState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| push_events(socket, state))
}

async fn push_events(mut socket: WebSocket, state: Arc<MockState>) {
    if state.options.send_greeting {
        let greeting =
            serde_json::json!({"type": "connected", "msg": "Welcome to the mesh event stream"})
                .to_string();
        if socket.send(WsMessage::Text(greeting)).await.is_err() {
            return;
        }
    }

    for frame in &state.options.event_frames {
        if socket.send(WsMessage::Text(frame.clone())).await.is_err() {
            return;
        }
    }

    // Hold the stream open until the client goes away.
    while let Some(Ok(_)) = socket.recv().await {}
}
