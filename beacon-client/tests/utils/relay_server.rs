use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use beacon_core::IceServerConfig;
use beacon_server::{AppState, StaticIceServers, serve_on};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A real relay on an ephemeral port, handing out a fixed ICE server list.
pub struct RelayServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl RelayServer {
    pub async fn start(ice_servers: Vec<IceServerConfig>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test listener")?;
        let addr = listener.local_addr().context("Listener has no address")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let state = AppState::new(Arc::new(StaticIceServers::new(ice_servers)));
        tokio::spawn(serve_on(listener, state, async move {
            let _ = shutdown_rx.await;
        }));

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
        })
    }

    pub fn host(&self) -> String {
        self.addr.to_string()
    }
}

impl Drop for RelayServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
