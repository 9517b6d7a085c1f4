use crate::error::WireError;
use crate::model::peer::PeerId;
use serde::{Deserialize, Deserializer, Serialize};

/// `type` tag of the relay's membership broadcast.
pub const PEER_LIST_TYPE: &str = "info:peerlist";

/// `type` tag of the first frame sent on a freshly opened data channel.
pub const IDENTITY_TYPE: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    #[serde(deserialize_with = "one_or_many")]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

// Browsers accept `urls` as either a single string or a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(url) => vec![url],
        OneOrMany::Many(urls) => urls,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
    Pranswer,
    Rollback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    #[serde(default)]
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Answer,
            sdp: sdp.into(),
        }
    }

    pub fn rollback() -> Self {
        Self {
            sdp_type: SdpType::Rollback,
            sdp: String::new(),
        }
    }

    pub fn is_offer(&self) -> bool {
        self.sdp_type == SdpType::Offer
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(
        default,
        rename = "sdpMLineIndex",
        skip_serializing_if = "Option::is_none"
    )]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

/// Every message the relay or a peer can put on a signaling socket or as the
/// first frame of a data channel.
///
/// On the wire the variants are told apart by the `type` tag (peer list,
/// identity handshake) or, for negotiation traffic, by which payload field is
/// present. Decoding settles that once; everything past the codec matches on
/// the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Envelope", into = "Envelope")]
pub enum SignalMessage {
    /// Relay → client. Current room membership minus the recipient.
    PeerList { peers: Vec<PeerId> },

    /// Offer or answer. `target` routes it at the relay; `from` lets the
    /// receiver address its reply.
    Description {
        description: SessionDescription,
        target: Option<PeerId>,
        from: Option<PeerId>,
    },

    /// Trickled connectivity candidate.
    Candidate {
        candidate: IceCandidate,
        target: Option<PeerId>,
        from: Option<PeerId>,
    },

    /// First frame on a data channel: who is on the other end.
    Identity { peer_id: PeerId },
}

impl SignalMessage {
    pub fn peer_list(peers: Vec<PeerId>) -> Self {
        Self::PeerList { peers }
    }

    pub fn description(
        description: SessionDescription,
        target: Option<PeerId>,
        from: Option<PeerId>,
    ) -> Self {
        Self::Description {
            description,
            target,
            from,
        }
    }

    pub fn candidate(candidate: IceCandidate, target: Option<PeerId>, from: Option<PeerId>) -> Self {
        Self::Candidate {
            candidate,
            target,
            from,
        }
    }

    pub fn identity(peer_id: PeerId) -> Self {
        Self::Identity { peer_id }
    }

    pub fn decode(text: &str) -> Result<Self, WireError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        Self::try_from(envelope)
    }

    pub fn encode(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn target(&self) -> Option<&PeerId> {
        match self {
            Self::Description { target, .. } | Self::Candidate { target, .. } => target.as_ref(),
            Self::PeerList { .. } | Self::Identity { .. } => None,
        }
    }

    pub fn from_peer(&self) -> Option<&PeerId> {
        match self {
            Self::Description { from, .. } | Self::Candidate { from, .. } => from.as_ref(),
            Self::PeerList { .. } | Self::Identity { .. } => None,
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    peers: Option<Vec<PeerId>>,
    #[serde(rename = "peerId", default, skip_serializing_if = "Option::is_none")]
    peer_id: Option<PeerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<SessionDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    candidate: Option<IceCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<PeerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<PeerId>,
}

impl TryFrom<Envelope> for SignalMessage {
    type Error = WireError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        match envelope {
            Envelope {
                kind: Some(kind),
                peers: Some(peers),
                ..
            } if kind == PEER_LIST_TYPE => Ok(Self::PeerList { peers }),

            Envelope {
                kind: Some(kind),
                peer_id: Some(peer_id),
                ..
            } if kind == IDENTITY_TYPE => Ok(Self::Identity { peer_id }),

            Envelope {
                kind: None,
                description: Some(description),
                candidate: None,
                target,
                from,
                ..
            } => Ok(Self::Description {
                description,
                target,
                from,
            }),

            Envelope {
                kind: None,
                description: None,
                candidate: Some(candidate),
                target,
                from,
                ..
            } => Ok(Self::Candidate {
                candidate,
                target,
                from,
            }),

            _ => Err(WireError::UnknownShape),
        }
    }
}

impl From<SignalMessage> for Envelope {
    fn from(message: SignalMessage) -> Self {
        match message {
            SignalMessage::PeerList { peers } => Envelope {
                kind: Some(PEER_LIST_TYPE.to_owned()),
                peers: Some(peers),
                ..Default::default()
            },
            SignalMessage::Identity { peer_id } => Envelope {
                kind: Some(IDENTITY_TYPE.to_owned()),
                peer_id: Some(peer_id),
                ..Default::default()
            },
            SignalMessage::Description {
                description,
                target,
                from,
            } => Envelope {
                description: Some(description),
                target,
                from,
                ..Default::default()
            },
            SignalMessage::Candidate {
                candidate,
                target,
                from,
            } => Envelope {
                candidate: Some(candidate),
                target,
                from,
                ..Default::default()
            },
        }
    }
}
