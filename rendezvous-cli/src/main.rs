use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use rendezvous_server::{LobbyRegistry, SignalingRouter, serve_lobby, serve_signaling};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rendezvous")]
#[command(about = "Room-based signaling relay and lobby server")]
struct Cli {
    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// WebSocket signaling relay
    Signal(SignalArgs),
    /// Lobby HTTP API
    Lobby(LobbyArgs),
    /// Signaling relay and lobby in one process
    Serve {
        #[command(flatten)]
        signal: SignalArgs,
        #[command(flatten)]
        lobby: LobbyArgs,
    },
}

#[derive(Args)]
struct SignalArgs {
    /// Signaling listen address; ":8080" binds all interfaces
    #[arg(long, env = "SIGNALING_ADDR", default_value = "0.0.0.0:8080", value_parser = parse_listen_addr)]
    listen: SocketAddr,
}

#[derive(Args)]
struct LobbyArgs {
    /// Lobby API port
    #[arg(long, env = "LOBBY_PORT", default_value_t = 5312)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Signal(signal) => run_signaling(signal).await,
        Commands::Lobby(lobby) => run_lobby(lobby).await,
        Commands::Serve { signal, lobby } => {
            tokio::try_join!(run_signaling(signal), run_lobby(lobby))?;
            Ok(())
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

async fn run_signaling(args: SignalArgs) -> Result<()> {
    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("Failed to bind signaling listener on {}", args.listen))?;
    let addr = listener.local_addr()?;

    println!("{}", "📡 Signaling relay ready".green().bold());
    println!(
        "   {} ws://{}/ws?peer_id=YOUR_ID&room=ROOM_CODE",
        "Connect:".cyan(),
        addr
    );
    info!("Starting WebSocket signaling server on {}", addr);

    serve_signaling(listener, SignalingRouter::new(), shutdown_signal())
        .await
        .context("Signaling server failed")
}

async fn run_lobby(args: LobbyArgs) -> Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind lobby listener on {}", addr))?;

    println!("{}", "🏠 Lobby API ready".green().bold());
    println!("   {} http://{}/v1/rooms", "Endpoint:".cyan(), addr);
    info!("Lobby server starting on {}", addr);

    serve_lobby(listener, LobbyRegistry::new(), shutdown_signal())
        .await
        .context("Lobby server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

fn parse_listen_addr(raw: &str) -> Result<SocketAddr, String> {
    let normalized = match raw.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{}", port),
        None => raw.to_owned(),
    };

    normalized
        .parse()
        .map_err(|e| format!("invalid listen address '{}': {}", raw, e))
}
