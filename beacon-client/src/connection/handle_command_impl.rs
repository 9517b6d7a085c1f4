use crate::connection::{Command, ConnectionDriver, ConnectionEvent};
use crate::error::ClientError;
use beacon_core::PeerId;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

impl ConnectionDriver {
    pub(super) async fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::ConnectToPeer { peer, reply } => {
                let result = self.connect_to_peer(peer).await;
                let _ = reply.send(result);
            }

            Command::Send { text, reply } => {
                let _ = reply.send(self.send_all(&text).await);
            }

            Command::SendTo { peer, text, reply } => {
                let _ = reply.send(self.send_to(&peer, &text).await);
            }

            Command::Close { reply } => {
                self.shutdown().await;
                let _ = reply.send(());
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    async fn connect_to_peer(&mut self, peer: PeerId) -> Result<(), ClientError> {
        if self.negotiator.role().is_none() {
            return Err(ClientError::RoleUndecided);
        }

        info!("Connecting to {}", peer);
        self.remote = Some(peer);

        let channel = self
            .transport
            .create_data_channel(&self.channel_label)
            .await?;
        self.register_channel(channel);
        Ok(())
    }

    async fn send_all(&self, text: &str) -> Result<usize, ClientError> {
        let mut reached = 0;
        for peer in self.identified_peers() {
            let Some(channel) = self.channel_for(&peer) else {
                continue;
            };
            match channel.send_text(text).await {
                Ok(()) => reached += 1,
                Err(e) => warn!("Send to {} failed: {}", peer, e),
            }
        }

        if reached == 0 {
            return Err(ClientError::NoOpenChannel);
        }
        Ok(reached)
    }

    async fn send_to(&self, peer: &PeerId, text: &str) -> Result<(), ClientError> {
        let channel = self
            .channel_for(peer)
            .ok_or_else(|| ClientError::UnknownPeer(peer.clone()))?;
        channel.send_text(text).await?;
        Ok(())
    }

    pub(super) async fn shutdown(&mut self) {
        info!("Closing connection {}", self.peer_id);

        let connected = self.identified_peers();
        let slots: Vec<_> = self.channels.drain().collect();
        for (id, slot) in slots {
            if let Err(e) = slot.channel.close().await {
                debug!("Closing channel {} failed: {}", id, e);
            }
        }

        if let Err(e) = self.transport.close().await {
            debug!("Closing peer connection failed: {}", e);
        }

        self.signaling = None;
        self.transport_rx = None;
        self.sync_view();

        for peer in connected {
            self.emit(ConnectionEvent::PeerDisconnected(peer));
        }
    }
}
