use std::net::SocketAddr;
use std::sync::Arc;

use beacon_server::{AppState, CredentialProvider, serve_on};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A relay bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    pub async fn start(credentials: Arc<dyn CredentialProvider>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(serve_on(listener, AppState::new(credentials), async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, room: &str, id: &str) -> String {
        format!("ws://{}/rooms/{}?_pk={}", self.addr, room, id)
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task
            .await
            .expect("Server task panicked")
            .expect("Server returned an error");
    }
}
