use anyhow::{Context, Result};
use beacon::client::{Connection, ConnectionEvent, ConnectOptions, Role};
use beacon::server::{RelayConfig, TurnConfig};
use clap::{Parser, Subcommand};
use colored::*;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beacon", version, about = "WebRTC signaling relay and peer client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a signaling relay.
    Serve {
        /// Overrides BEACON_BIND.
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// STUN urls handed out without TURN credentials. Overrides BEACON_STUN_SERVERS.
        #[arg(long = "stun", value_delimiter = ',')]
        stun_servers: Vec<String>,

        #[arg(long, requires = "turn_api_token")]
        turn_app_id: Option<String>,

        #[arg(long, requires = "turn_app_id")]
        turn_api_token: Option<String>,
    },

    /// Join a room and chat over a data channel. Lines typed on stdin are sent
    /// to every connected peer; `/quit` leaves.
    Join {
        room: String,

        #[arg(long, default_value = "localhost:1999")]
        host: String,

        /// Proposed peer id. A random one is used otherwise.
        #[arg(long)]
        id: Option<String>,

        /// Skip the relay's credential route and use plain STUN.
        #[arg(long)]
        no_turn: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve {
            bind,
            stun_servers,
            turn_app_id,
            turn_api_token,
        } => {
            let mut config = RelayConfig::from_env().context("Invalid relay configuration")?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if !stun_servers.is_empty() {
                config.stun_servers = stun_servers;
            }
            if let (Some(app_id), Some(api_token)) = (turn_app_id, turn_api_token) {
                config.turn = Some(TurnConfig::new(app_id, api_token));
            }

            if config.turn.is_none() {
                println!("{}", "⚠️  No TURN credentials, serving STUN only".yellow());
            }
            beacon::server::serve(config).await
        }

        Commands::Join {
            room,
            host,
            id,
            no_turn,
        } => join(host, room, id, no_turn).await,
    }
}

async fn join(host: String, room: String, id: Option<String>, no_turn: bool) -> Result<()> {
    let mut options = ConnectOptions::new(&host, room.as_str()).fetch_ice_servers(!no_turn);
    if let Some(id) = id {
        options = options.with_peer_id(id);
    }

    let mut connection = Connection::connect(options)
        .await
        .with_context(|| format!("Failed to join room '{room}' on {host}"))?;
    println!(
        "{} {} as {}",
        "🚀 Joined".green().bold(),
        room.bold(),
        connection.peer_id().to_string().cyan()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut dialed = false;

    loop {
        tokio::select! {
            event = connection.next_event() => {
                let Some(event) = event else { break };

                // The later arrival dials; the first one waits to be called.
                if let ConnectionEvent::PeerList(peers) = &event {
                    if !dialed && connection.role() == Some(Role::Impolite) {
                        if let Some(first) = peers.first() {
                            dialed = true;
                            if let Err(e) = connection.connect_to_peer(first.clone()).await {
                                println!("{} {}", "✗ Dial failed:".red(), e);
                            }
                        }
                    }
                }
                print_event(&event);
            }

            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "/quit" {
                    break;
                }
                match connection.send(line).await {
                    Ok(reached) => println!("{}", format!("  sent to {reached} peer(s)").dimmed()),
                    Err(e) => println!("{} {}", "✗".red(), e),
                }
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    connection.close().await;
    println!("{}", "👋 Left the room".green());
    Ok(())
}

fn print_event(event: &ConnectionEvent) {
    match event {
        ConnectionEvent::PeerList(peers) => {
            let peers: Vec<String> = peers.iter().map(ToString::to_string).collect();
            println!("{} [{}]", "👥 Peers:".cyan(), peers.join(", "));
        }
        ConnectionEvent::RoleAssigned(role) => {
            println!("{}", format!("   role: {role:?}").dimmed());
        }
        ConnectionEvent::DataChannel { label } => {
            println!("{}", format!("   channel '{label}' open").dimmed());
        }
        ConnectionEvent::PeerConnected(peer) => {
            println!("{} {}", "✔ Connected to".green().bold(), peer.to_string().bold());
        }
        ConnectionEvent::PeerDisconnected(peer) => {
            println!("{} {}", "✗ Disconnected from".yellow(), peer);
        }
        ConnectionEvent::Message { data, peer } => {
            println!("{} {}", format!("[{peer}]").cyan().bold(), data);
        }
        ConnectionEvent::IceStateChanged(state) => {
            println!("{}", format!("   ice: {state:?}").dimmed());
        }
        ConnectionEvent::SignalingClosed => {
            println!("{}", "⚠ Relay connection closed".yellow());
        }
        ConnectionEvent::Error(e) => {
            println!("{} {}", "✗ Error:".red(), e);
        }
    }
}
