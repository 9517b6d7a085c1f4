use crate::transport::TransportError;
use beacon_core::{PeerId, WireError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No peer-connection implementation is available. Raised at construction
    /// and never retried.
    #[error("WebRTC is not available in this build")]
    RtcUnavailable,

    /// A negotiation step ran before the first peer list decided politeness.
    #[error("role is not decided yet, wait for the first peer list")]
    RoleUndecided,

    #[error("invalid relay address: {0}")]
    InvalidUrl(String),

    #[error("signaling socket is closed")]
    SignalingClosed,

    #[error("signaling socket failed: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("ICE server request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("no open data channel to {0}")]
    UnknownPeer(PeerId),

    #[error("no open data channel")]
    NoOpenChannel,

    #[error("connection is closed")]
    Closed,
}
