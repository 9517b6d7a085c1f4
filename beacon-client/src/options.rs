use crate::error::ClientError;
use crate::transport::RtcProvider;
use beacon_core::{IceServerConfig, PeerId, RoomId};
use reqwest::Url;
use std::sync::Arc;

pub const DEFAULT_CHANNEL_LABEL: &str = "data";
pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

/// How to reach a room and what to bring along.
#[derive(Clone)]
pub struct ConnectOptions {
    /// Relay address. `host:port` or a full `http(s)://` / `ws(s)://` URL.
    pub host: String,
    pub room: RoomId,
    /// Proposed identity. The relay generates one when absent, but the
    /// client needs to know its own id for the handshake, so one is always
    /// minted locally.
    pub peer_id: Option<PeerId>,
    pub channel_label: String,
    /// Ask the relay for TURN credentials before creating the peer connection.
    pub fetch_ice_servers: bool,
    /// Used as-is without fetching, and as the fallback when a fetch fails.
    pub ice_servers: Vec<IceServerConfig>,
    pub rtc: Option<Arc<dyn RtcProvider>>,
}

impl ConnectOptions {
    pub fn new(host: impl Into<String>, room: impl Into<RoomId>) -> Self {
        Self {
            host: host.into(),
            room: room.into(),
            peer_id: None,
            channel_label: DEFAULT_CHANNEL_LABEL.to_owned(),
            fetch_ice_servers: true,
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_SERVER)],
            rtc: None,
        }
    }

    pub fn with_peer_id(mut self, peer_id: impl Into<PeerId>) -> Self {
        self.peer_id = Some(peer_id.into());
        self
    }

    pub fn with_rtc(mut self, rtc: Arc<dyn RtcProvider>) -> Self {
        self.rtc = Some(rtc);
        self
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<IceServerConfig>) -> Self {
        self.ice_servers = ice_servers;
        self
    }

    pub fn with_channel_label(mut self, label: impl Into<String>) -> Self {
        self.channel_label = label.into();
        self
    }

    pub fn fetch_ice_servers(mut self, fetch: bool) -> Self {
        self.fetch_ice_servers = fetch;
        self
    }
}

fn is_local(host: &str) -> bool {
    host.starts_with("localhost") || host.starts_with("127.") || host.starts_with("[::1]")
}

fn relay_base(host: &str) -> Result<Url, ClientError> {
    let host = host.trim_end_matches('/');
    let full = if host.contains("://") {
        host.to_owned()
    } else if is_local(host) {
        format!("http://{host}")
    } else {
        format!("https://{host}")
    };
    Url::parse(&full).map_err(|e| ClientError::InvalidUrl(format!("{host}: {e}")))
}

fn with_scheme(mut url: Url, secure: &str, plain: &str) -> Result<Url, ClientError> {
    let scheme = match url.scheme() {
        "http" | "ws" => plain,
        "https" | "wss" => secure,
        other => return Err(ClientError::InvalidUrl(format!("unsupported scheme {other}"))),
    };
    url.set_scheme(scheme)
        .map_err(|_| ClientError::InvalidUrl(format!("cannot switch {url} to {scheme}")))?;
    Ok(url)
}

fn with_segments(mut url: Url, segments: &[&str]) -> Result<Url, ClientError> {
    let msg = format!("{url} cannot carry a path");
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(msg))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `ws(s)://<host>/rooms/<room>?_pk=<id>`
pub fn signaling_url(host: &str, room: &str, peer_id: &PeerId) -> Result<Url, ClientError> {
    let url = with_scheme(relay_base(host)?, "wss", "ws")?;
    let mut url = with_segments(url, &["rooms", room])?;
    url.query_pairs_mut().append_pair("_pk", peer_id.as_str());
    Ok(url)
}

/// `http(s)://<host>/rooms/<room>/turn`
pub fn credentials_url(host: &str, room: &str) -> Result<Url, ClientError> {
    let url = with_scheme(relay_base(host)?, "https", "http")?;
    with_segments(url, &["rooms", room, "turn"])
}
