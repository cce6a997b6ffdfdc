//! Shadowcast CLI — run raw twin-graph events through the bridge.
//!
//! Usage:
//!   shadowcast process [--event path] [--endpoint url]
//!
//! Reads one raw event envelope (JSON, CloudEvent-shaped) from a file or
//! stdin, processes it against the configured graph store, and prints the
//! normalized payload to stdout.

use clap::{Parser, Subcommand};
use shadowcast::{
    BridgeConfig, HttpGraphClient, Outcome, RawEvent, SnapshotBridge, StdoutPublisher,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "shadowcast",
    version,
    about = "Twin-graph snapshot event bridge"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one raw event envelope through the bridge
    Process {
        /// Path to the event envelope (stdin when omitted)
        #[arg(long)]
        event: Option<PathBuf>,
        /// Graph store endpoint (overrides ADT_SERVICE_URL)
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn read_envelope(path: Option<PathBuf>) -> Result<RawEvent, String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            buffer
        }
    };
    serde_json::from_str(&text).map_err(|e| format!("Invalid event envelope: {}", e))
}

async fn run_process(event: Option<PathBuf>, endpoint: Option<String>) -> Result<(), String> {
    let config = match endpoint {
        Some(url) => BridgeConfig::new(url),
        None => BridgeConfig::from_env().map_err(|e| e.to_string())?,
    };
    let graph = Arc::new(HttpGraphClient::new(&config));
    let bridge = SnapshotBridge::new(graph, Arc::new(StdoutPublisher));

    let raw = read_envelope(event)?;
    match bridge
        .handle(&raw)
        .await
        .map_err(|e| format!("Publish failed: {}", e))?
    {
        Outcome::Published(_) => Ok(()),
        Outcome::Filtered { model } => {
            eprintln!("Event filtered: external twin model {}", model);
            Ok(())
        }
        Outcome::Dropped(reason) => {
            eprintln!("Event dropped: {:?}", reason);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Process { event, endpoint } => run_process(event, endpoint).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
