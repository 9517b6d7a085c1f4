pub mod config;
pub mod credentials;
pub mod room;
pub mod router;
pub mod signaling;

pub use config::{RelayConfig, TurnConfig};
pub use credentials::{CloudflareTurn, CredentialError, CredentialProvider, StaticIceServers};
pub use room::{ConnectionId, MemberHandle, RoomManager};
pub use router::{LIVENESS_TEXT, router};

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub rooms: RoomManager,
    pub credentials: Arc<dyn CredentialProvider>,
}

impl AppState {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            rooms: RoomManager::new(),
            credentials,
        }
    }
}

/// Bind `config.bind` and run the relay until Ctrl-C.
pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    serve_on(listener, AppState::new(config.credential_provider()), shutdown_signal()).await
}

/// Run the relay on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Signaling server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("relay server stopped with an error")?;

    info!("Signaling server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
