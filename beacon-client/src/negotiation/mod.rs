//! Perfect negotiation as a plain state machine. No I/O happens here: the
//! connection driver asks what to do, performs the transport calls and
//! reports the outcome back.

use crate::error::ClientError;
use crate::transport::{IceConnectionState, SignalingState};
use beacon_core::{PeerId, SdpType};
use tracing::{debug, info};

/// Tie-break role for simultaneous offers, fixed by the first peer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Arrived first. Yields its own offer on collision.
    Polite,
    /// Arrived later. Ignores colliding offers.
    Impolite,
}

impl Role {
    pub fn from_first_peer_list(peers: &[PeerId]) -> Self {
        if peers.is_empty() {
            Role::Polite
        } else {
            Role::Impolite
        }
    }

    pub fn is_polite(self) -> bool {
        self == Role::Polite
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationPhase {
    #[default]
    Idle,
    Negotiating,
    Stable,
}

/// Handed out by [`Negotiator::begin_offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferPlan {
    pub ice_restart: bool,
}

/// What to do with an incoming session description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemotePlan {
    /// Colliding offer on the impolite side. Drop it untouched.
    Ignore,
    Apply {
        /// Roll the pending local offer back first.
        rollback: bool,
        /// The description is an offer and needs an answer.
        answer: bool,
    },
}

#[derive(Debug, Default)]
pub struct Negotiator {
    role: Option<Role>,
    making_offer: bool,
    setting_remote_answer_pending: bool,
    ignore_offer: bool,
    ice_restart_pending: bool,
    phase: NegotiationPhase,
    completed_rounds: u64,
}

impl Negotiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide the role from a peer list. Only the first call has an effect;
    /// it returns the role it assigned.
    pub fn assign_role(&mut self, peers: &[PeerId]) -> Option<Role> {
        if self.role.is_some() {
            return None;
        }
        let role = Role::from_first_peer_list(peers);
        info!("Assigned role {:?} ({} peers present)", role, peers.len());
        self.role = Some(role);
        Some(role)
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn phase(&self) -> NegotiationPhase {
        self.phase
    }

    pub fn is_making_offer(&self) -> bool {
        self.making_offer
    }

    pub fn is_ignoring_offer(&self) -> bool {
        self.ignore_offer
    }

    pub fn ice_restart_pending(&self) -> bool {
        self.ice_restart_pending
    }

    /// Offer/answer rounds that reached `stable`.
    pub fn completed_rounds(&self) -> u64 {
        self.completed_rounds
    }

    /// Start making an offer. `Ok(None)` means one is already in progress and
    /// this trigger is skipped.
    pub fn begin_offer(&mut self) -> Result<Option<OfferPlan>, ClientError> {
        if self.role.is_none() {
            return Err(ClientError::RoleUndecided);
        }
        if self.making_offer {
            debug!("Offer already in progress, skipping");
            return Ok(None);
        }

        self.making_offer = true;
        self.phase = NegotiationPhase::Negotiating;
        let ice_restart = std::mem::take(&mut self.ice_restart_pending);
        Ok(Some(OfferPlan { ice_restart }))
    }

    /// Clears the offer guard, whether the offer went out or not.
    pub fn finish_offer(&mut self) {
        self.making_offer = false;
    }

    pub fn on_remote_description(
        &mut self,
        sdp_type: SdpType,
        state: SignalingState,
    ) -> Result<RemotePlan, ClientError> {
        let role = self.role.ok_or(ClientError::RoleUndecided)?;
        let is_offer = sdp_type == SdpType::Offer;

        let ready_for_offer = !self.making_offer
            && (state == SignalingState::Stable || self.setting_remote_answer_pending);
        let offer_collision = is_offer && !ready_for_offer;

        self.ignore_offer = !role.is_polite() && offer_collision;
        if self.ignore_offer {
            debug!("Offer collision, impolite side ignores the remote offer");
            return Ok(RemotePlan::Ignore);
        }

        self.setting_remote_answer_pending = sdp_type == SdpType::Answer;
        self.phase = NegotiationPhase::Negotiating;

        Ok(RemotePlan::Apply {
            rollback: is_offer && state == SignalingState::HaveLocalOffer,
            answer: is_offer,
        })
    }

    pub fn remote_description_applied(&mut self, state: SignalingState) {
        self.setting_remote_answer_pending = false;
        self.settle(state);
    }

    pub fn local_description_applied(&mut self, state: SignalingState) {
        self.settle(state);
    }

    /// A description or offer step failed. The next round starts clean.
    pub fn round_failed(&mut self) {
        self.making_offer = false;
        self.setting_remote_answer_pending = false;
        self.phase = if self.completed_rounds > 0 {
            NegotiationPhase::Stable
        } else {
            NegotiationPhase::Idle
        };
    }

    /// Whether a failed candidate belongs to an offer we chose to ignore.
    pub fn should_swallow_candidate_error(&self) -> bool {
        self.ignore_offer
    }

    /// Returns true when the state calls for an ICE restart.
    pub fn on_ice_state(&mut self, state: IceConnectionState) -> bool {
        if state == IceConnectionState::Failed {
            self.request_ice_restart();
            return true;
        }
        false
    }

    /// The next offer carries the ICE restart flag.
    pub fn request_ice_restart(&mut self) {
        self.ice_restart_pending = true;
    }

    fn settle(&mut self, state: SignalingState) {
        if state == SignalingState::Stable && self.phase == NegotiationPhase::Negotiating {
            self.phase = NegotiationPhase::Stable;
            self.completed_rounds += 1;
        }
    }
}
