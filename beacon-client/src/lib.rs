pub mod connection;
pub mod error;
pub mod ice;
pub mod negotiation;
pub mod options;
pub mod signaling;
pub mod transport;

pub use connection::{Connection, ConnectionEvent};
pub use error::ClientError;
pub use ice::fetch_ice_servers;
pub use negotiation::{NegotiationPhase, Negotiator, OfferPlan, RemotePlan, Role};
pub use options::{ConnectOptions, credentials_url, signaling_url};
pub use signaling::{SignalingChannel, connect_ws};
pub use transport::{
    ChannelId, DataChannel, IceConnectionState, PeerTransport, RtcProvider, SignalingState,
    TransportError, TransportEvent,
};

#[cfg(feature = "webrtc")]
pub use transport::WebRtcProvider;
