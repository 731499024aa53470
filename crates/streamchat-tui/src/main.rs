//! StreamChat terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Chat against the in-process simulated server
//! streamchat
//!
//! # Connect to a real server, with the name prefilled
//! streamchat --server ws://localhost:8080 --name Alex
//! ```

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use streamchat_app::{InputState, Runtime, SessionConfig};
use streamchat_client::simulation::SimulationConfig;
use streamchat_tui::TerminalDriver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// StreamChat terminal client
#[derive(Parser, Debug)]
#[command(name = "streamchat")]
#[command(about = "Terminal client for StreamChat")]
#[command(version)]
struct Args {
    /// WebSocket server URL (ws:// or wss://)
    ///
    /// If not provided, runs in simulation mode with an in-process server.
    #[arg(short, long)]
    server: Option<String>,

    /// Name to prefill on the join screen
    #[arg(short, long)]
    name: Option<String>,

    /// File to write logs to (the terminal belongs to the UI)
    #[arg(long, default_value = "streamchat.log")]
    log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seed for simulated peer chatter
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    match &args.server {
        Some(url) => tracing::info!(%url, "StreamChat starting"),
        None => tracing::info!(seed = args.seed, "StreamChat starting in simulation mode"),
    }

    let simulation = SimulationConfig { seed: args.seed, ..SimulationConfig::default() };
    let input = args.name.as_deref().map_or_else(InputState::new, InputState::with_identity);

    let driver = TerminalDriver::new(simulation, input)?;
    let runtime = Runtime::new(driver, SessionConfig::new(args.server));

    Ok(runtime.run().await?)
}
