use crate::connection::{ChannelSlot, ConnectionDriver, ConnectionEvent};
use crate::transport::{ChannelId, DataChannel};
use beacon_core::{PeerId, SignalMessage};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl ConnectionDriver {
    pub(super) fn register_channel(&mut self, channel: Arc<dyn DataChannel>) {
        let id = channel.id();
        debug!("Data channel {} '{}' registered", id, channel.label());

        self.channels.entry(id).or_insert(ChannelSlot {
            channel,
            peer: None,
            open: false,
        });
    }

    /// Announce ourselves on a freshly opened channel.
    pub(super) async fn on_channel_open(&mut self, id: ChannelId) {
        let Some(slot) = self.channels.get_mut(&id) else {
            warn!("Open event for unknown channel {}", id);
            return;
        };
        slot.open = true;
        let channel = slot.channel.clone();

        let label = channel.label();
        info!("Data channel {} '{}' open", id, label);
        self.emit(ConnectionEvent::DataChannel { label });

        let handshake = match SignalMessage::identity(self.peer_id.clone()).encode() {
            Ok(handshake) => handshake,
            Err(e) => {
                self.emit_error(e.into());
                return;
            }
        };
        if let Err(e) = channel.send_text(&handshake).await {
            self.emit_error(e.into());
        }
    }

    /// The first frame must be the remote identity; everything after is payload.
    pub(super) fn on_channel_message(&mut self, id: ChannelId, text: String) {
        let Some(slot) = self.channels.get_mut(&id) else {
            warn!("Message on unknown channel {}", id);
            return;
        };

        if let Some(peer) = &slot.peer {
            let peer = peer.clone();
            self.emit(ConnectionEvent::Message { data: text, peer });
            return;
        }

        let peer = match SignalMessage::decode(&text) {
            Ok(SignalMessage::Identity { peer_id }) => peer_id,
            _ => {
                warn!("Expected identity handshake on channel {}, dropping frame", id);
                return;
            }
        };
        slot.peer = Some(peer.clone());
        self.sync_view();

        let channels_to_peer = self
            .channels
            .values()
            .filter(|s| s.peer.as_ref() == Some(&peer))
            .count();
        if channels_to_peer == 1 {
            info!("Peer {} connected", peer);
            self.emit(ConnectionEvent::PeerConnected(peer));
        }
    }

    pub(super) fn on_channel_closed(&mut self, id: ChannelId) {
        let Some(slot) = self.channels.remove(&id) else {
            return;
        };
        debug!("Data channel {} closed", id);
        self.sync_view();

        if let Some(peer) = slot.peer {
            if !self.is_connected(&peer) {
                info!("Peer {} disconnected", peer);
                self.emit(ConnectionEvent::PeerDisconnected(peer));
            }
        }
    }

    fn is_connected(&self, peer: &PeerId) -> bool {
        self.channels
            .values()
            .any(|slot| slot.peer.as_ref() == Some(peer))
    }

    pub(super) fn identified_peers(&self) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .channels
            .values()
            .filter_map(|slot| slot.peer.clone())
            .collect();
        peers.sort();
        peers.dedup();
        peers
    }

    /// An open channel to `peer`, if there is one.
    pub(super) fn channel_for(&self, peer: &PeerId) -> Option<Arc<dyn DataChannel>> {
        self.channels
            .values()
            .find(|slot| slot.open && slot.peer.as_ref() == Some(peer))
            .map(|slot| slot.channel.clone())
    }
}
