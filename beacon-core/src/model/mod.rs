mod peer;
mod room;
mod signaling;

pub use peer::PeerId;
pub use room::RoomId;
pub use signaling::{
    IceCandidate, IceServerConfig, PEER_LIST_TYPE, IDENTITY_TYPE, SdpType, SessionDescription,
    SignalMessage,
};
