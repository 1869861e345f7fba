//! MeshLink gateway verifier - registers an agent, runs one chat completion
//! exchange, and watches the mesh event stream for a status event.

use std::env;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod flows;

use config::Config;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    println!("meshlink-verify {}", VERSION);
    println!();
    println!("Usage: meshlink-verify [chat|events|all]");
    println!("  chat    register an agent and run one chat completion");
    println!("  events  wait for a mesh_status event on the event stream");
    println!("  all     run both flows in sequence (default)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("meshlink-verify {}", VERSION);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml is valid or use MESHLINK__GATEWAY__BASE_URL style environment variables.",
            e
        )
    })?;
    tracing::info!("Verifying gateway at {}", config.gateway.base_url);

    match args.get(1).map(String::as_str).unwrap_or("all") {
        "chat" => run_chat(&config).await,
        "events" => run_events(&config).await,
        "all" => {
            run_chat(&config).await?;
            run_events(&config).await
        }
        other => {
            print_usage();
            Err(format!("Unknown flow '{}'", other).into())
        }
    }
}

async fn run_chat(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = flows::verify_chat(config).await {
        println!("Chat verification failed: {}", e);
        return Err(e.into());
    }
    println!("Chat verification successful.");
    Ok(())
}

async fn run_events(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let cancel = CancellationToken::new();

    // Ctrl-C and the optional configured timeout both bound the wait.
    let ctrlc_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling event wait");
            ctrlc_cancel.cancel();
        }
    });

    if let Some(secs) = config.listener.timeout_secs {
        let timeout_cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            tracing::info!("Event wait timed out after {}s", secs);
            timeout_cancel.cancel();
        });
    }

    if let Err(e) = flows::verify_events(config, &cancel).await {
        println!("Event verification failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}
