use crate::connection::ConnectionDriver;
use crate::error::ClientError;
use crate::negotiation::RemotePlan;
use crate::transport::SignalingState;
use beacon_core::{PeerId, SessionDescription, SignalMessage};
use tracing::info;

impl ConnectionDriver {
    pub(super) async fn handle_remote_description(
        &mut self,
        description: SessionDescription,
        from: Option<PeerId>,
    ) {
        let state = self.transport.signaling_state();
        let plan = match self
            .negotiator
            .on_remote_description(description.sdp_type, state)
        {
            Ok(plan) => plan,
            Err(e) => {
                self.emit_error(e);
                return;
            }
        };

        let RemotePlan::Apply { rollback, answer } = plan else {
            info!("Ignoring colliding offer from {:?}", from);
            return;
        };

        if let Some(from) = from {
            self.remote = Some(from);
        }

        if let Err(e) = self.apply_remote_description(description, rollback, answer).await {
            self.negotiator.round_failed();
            self.emit_error(e);
        }
        self.sync_view();

        if self.negotiator.ice_restart_pending()
            && self.transport.signaling_state() == SignalingState::Stable
        {
            self.negotiate().await;
        }
    }

    async fn apply_remote_description(
        &mut self,
        description: SessionDescription,
        rollback: bool,
        answer: bool,
    ) -> Result<(), ClientError> {
        if rollback {
            info!("Offer collision, rolling back local offer");
            self.transport
                .set_local_description(SessionDescription::rollback())
                .await?;
        }

        self.transport.set_remote_description(description).await?;
        self.negotiator
            .remote_description_applied(self.transport.signaling_state());

        if !answer {
            return Ok(());
        }

        let answer = self.transport.create_answer().await?;
        self.transport.set_local_description(answer.clone()).await?;
        self.negotiator
            .local_description_applied(self.transport.signaling_state());

        let target = self.reply_target();
        info!("Sending answer to {:?}", target);
        self.send_signal(SignalMessage::description(
            answer,
            target,
            Some(self.peer_id.clone()),
        ))
    }
}
