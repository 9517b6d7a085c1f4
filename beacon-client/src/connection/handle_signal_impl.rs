use crate::connection::{ConnectionDriver, ConnectionEvent};
use beacon_core::{IceCandidate, PeerId, SignalMessage};
use tracing::{debug, warn};

impl ConnectionDriver {
    pub(super) async fn handle_signal(&mut self, message: SignalMessage) {
        match message {
            SignalMessage::PeerList { peers } => self.on_peer_list(peers),

            SignalMessage::Description {
                description, from, ..
            } => self.handle_remote_description(description, from).await,

            SignalMessage::Candidate {
                candidate, from, ..
            } => self.handle_remote_candidate(candidate, from).await,

            SignalMessage::Identity { peer_id } => {
                warn!("Identity handshake from {} on the signaling socket, ignored", peer_id);
            }
        }
    }

    fn on_peer_list(&mut self, peers: Vec<PeerId>) {
        debug!("Peer list: {:?}", peers);
        let assigned = self.negotiator.assign_role(&peers);
        self.peers = peers.clone();
        self.sync_view();

        if let Some(role) = assigned {
            self.emit(ConnectionEvent::RoleAssigned(role));
        }
        self.emit(ConnectionEvent::PeerList(peers));
    }

    async fn handle_remote_candidate(&mut self, candidate: IceCandidate, from: Option<PeerId>) {
        let Err(e) = self.transport.add_ice_candidate(candidate).await else {
            return;
        };

        if self.negotiator.should_swallow_candidate_error() {
            debug!("Dropping candidate from {:?} for an ignored offer: {}", from, e);
        } else {
            self.emit_error(e.into());
        }
    }
}
