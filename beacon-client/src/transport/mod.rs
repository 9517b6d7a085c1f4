//! The peer-connection capability the negotiation engine drives. The engine
//! never touches a WebRTC stack directly; it talks to these traits and reacts
//! to [`TransportEvent`]s.

#[cfg(feature = "webrtc")]
mod webrtc_transport;

#[cfg(feature = "webrtc")]
pub use webrtc_transport::WebRtcProvider;

use async_trait::async_trait;
use beacon_core::{IceCandidate, IceServerConfig, SessionDescription};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::mpsc;

/// Process-unique handle for a data channel.
pub type ChannelId = u64;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

pub fn next_channel_id() -> ChannelId {
    NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingState {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    HaveLocalPranswer,
    HaveRemotePranswer,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceConnectionState {
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("peer connection is not supported here")]
    Unsupported,

    #[error("data channel {0} is not open")]
    ChannelClosed(ChannelId),

    #[error("peer connection is closed")]
    Closed,

    #[error("rtc: {0}")]
    Rtc(String),
}

/// Everything a peer connection reports back, delivered in order on the
/// channel handed to [`RtcProvider::create_peer`].
pub enum TransportEvent {
    NegotiationNeeded,
    LocalCandidate(IceCandidate),
    IceStateChanged(IceConnectionState),
    /// The remote side opened a channel.
    DataChannel(Arc<dyn DataChannel>),
    ChannelOpen(ChannelId),
    ChannelMessage(ChannelId, String),
    ChannelClosed(ChannelId),
}

#[async_trait]
pub trait DataChannel: Send + Sync {
    fn id(&self) -> ChannelId;

    fn label(&self) -> String;

    async fn send_text(&self, text: &str) -> Result<(), TransportError>;

    async fn close(&self) -> Result<(), TransportError>;
}

#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Open a channel. The first one fires `NegotiationNeeded`.
    async fn create_data_channel(&self, label: &str) -> Result<Arc<dyn DataChannel>, TransportError>;

    async fn create_offer(&self, ice_restart: bool) -> Result<SessionDescription, TransportError>;

    async fn create_answer(&self) -> Result<SessionDescription, TransportError>;

    /// Also takes a rollback description to abandon a pending local offer.
    async fn set_local_description(&self, description: SessionDescription) -> Result<(), TransportError>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), TransportError>;

    fn signaling_state(&self) -> SignalingState;

    async fn close(&self) -> Result<(), TransportError>;
}

#[async_trait]
pub trait RtcProvider: Send + Sync {
    async fn create_peer(
        &self,
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError>;
}

/// The provider used when the caller supplies none.
pub fn default_provider() -> Option<Arc<dyn RtcProvider>> {
    #[cfg(feature = "webrtc")]
    {
        Some(Arc::new(WebRtcProvider::default()))
    }

    #[cfg(not(feature = "webrtc"))]
    {
        None
    }
}
