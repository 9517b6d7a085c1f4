use crate::connection::ConnectionDriver;
use crate::error::ClientError;
use beacon_core::SignalMessage;
use tracing::info;

impl ConnectionDriver {
    /// Run one offer round unless one is already in flight.
    pub(super) async fn negotiate(&mut self) {
        let plan = match self.negotiator.begin_offer() {
            Ok(Some(plan)) => plan,
            Ok(None) => return,
            Err(e) => {
                self.emit_error(e);
                return;
            }
        };

        let result = self.make_offer(plan.ice_restart).await;
        self.negotiator.finish_offer();

        if let Err(e) = result {
            self.negotiator.round_failed();
            if plan.ice_restart {
                self.negotiator.request_ice_restart();
            }
            self.emit_error(e);
        }
        self.sync_view();
    }

    async fn make_offer(&mut self, ice_restart: bool) -> Result<(), ClientError> {
        let offer = self.transport.create_offer(ice_restart).await?;
        self.transport.set_local_description(offer.clone()).await?;
        self.negotiator
            .local_description_applied(self.transport.signaling_state());

        let target = self.reply_target();
        if ice_restart {
            info!("Sending ICE restart offer to {:?}", target);
        } else {
            info!("Sending offer to {:?}", target);
        }

        self.send_signal(SignalMessage::description(
            offer,
            target,
            Some(self.peer_id.clone()),
        ))
    }
}
