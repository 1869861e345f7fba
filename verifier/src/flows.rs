//! The two verification flows.
//!
//! Each flow prints human-readable status lines and returns the first error
//! it hits; the caller decides how to report it. Registration failure
//! short-circuits the completion call.

use tokio_util::sync::CancellationToken;

use meshlink_client::{CompletionClient, EventListener, Registrar, Result};
use meshlink_common::ChatMessage;

use crate::config::Config;

/// Register an agent and run one authenticated chat exchange.
pub async fn verify_chat(config: &Config) -> Result<()> {
    let registrar = Registrar::new(&config.gateway);

    println!("Checking gateway at {}...", config.gateway.base_url);
    registrar.health().await?;
    println!("Gateway is reachable.");

    println!("Registering agent '{}'...", config.agent.name);
    let registration = registrar.register(&config.agent.name).await?;
    println!(
        "Registered: id={} key={}",
        registration.agent_id, registration.api_key
    );

    let agents = registrar.list().await?;
    if agents.iter().any(|a| a.id == registration.agent_id) {
        println!("Agent is visible in the gateway registry.");
    } else {
        println!(
            "Warning: agent {} not found in the registry listing.",
            registration.agent_id
        );
    }

    println!(
        "Requesting chat completion from model '{}'...",
        config.agent.model
    );
    let client = CompletionClient::new(&config.gateway);
    let messages = [
        ChatMessage::system("You are a helpful assistant running on the decentralized mesh."),
        ChatMessage::user("Hello mesh! Can you process this request with my new credentials?"),
    ];
    let reply = client
        .complete(&registration.api_key, &config.agent.model, &messages)
        .await?;

    println!("Mesh response: {}", reply.content);
    println!("Model used: {}", reply.model);
    println!("Exchange id: {}", reply.id);

    Ok(())
}

/// Wait on the event stream until a `mesh_status` event arrives.
pub async fn verify_events(config: &Config, cancel: &CancellationToken) -> Result<()> {
    let listener = EventListener::new(&config.gateway);

    println!("Listening for events at {}...", config.gateway.events_url());
    let status = listener.listen(cancel).await?;
    println!("Received mesh status: {}", status);
    println!("Event stream verification successful.");

    Ok(())
}
