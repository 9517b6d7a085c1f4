use crate::connection::{ConnectionDriver, ConnectionEvent};
use crate::transport::{IceConnectionState, SignalingState, TransportEvent};
use beacon_core::SignalMessage;
use tracing::{debug, info, warn};

impl ConnectionDriver {
    pub(super) async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::NegotiationNeeded => {
                debug!("Negotiation needed");
                self.negotiate().await;
            }

            TransportEvent::LocalCandidate(candidate) => {
                let message = SignalMessage::candidate(
                    candidate,
                    self.reply_target(),
                    Some(self.peer_id.clone()),
                );
                if let Err(e) = self.send_signal(message) {
                    debug!("Local candidate not sent: {}", e);
                }
            }

            TransportEvent::IceStateChanged(state) => self.on_ice_state(state).await,

            TransportEvent::DataChannel(channel) => self.register_channel(channel),

            TransportEvent::ChannelOpen(id) => self.on_channel_open(id).await,

            TransportEvent::ChannelMessage(id, text) => self.on_channel_message(id, text),

            TransportEvent::ChannelClosed(id) => self.on_channel_closed(id),
        }
    }

    async fn on_ice_state(&mut self, state: IceConnectionState) {
        info!("ICE connection state: {:?}", state);
        self.emit(ConnectionEvent::IceStateChanged(state));

        if !self.negotiator.on_ice_state(state) {
            return;
        }

        warn!("ICE failed, restarting");
        // An offer still waiting on its answer keeps the flag for the next round.
        match self.transport.signaling_state() {
            SignalingState::Stable => self.negotiate().await,
            other => debug!("ICE restart deferred until stable ({:?})", other),
        }
    }
}
