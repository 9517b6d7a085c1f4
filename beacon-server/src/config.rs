use crate::credentials::{CloudflareTurn, CredentialProvider, StaticIceServers};
use anyhow::Context;
use beacon_core::IceServerConfig;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 1999;
pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";
pub const CLOUDFLARE_TURN_ENDPOINT: &str = "https://rtc.live.cloudflare.com/v1/turn/keys";
pub const DEFAULT_TURN_TTL_SECS: u64 = 86_400;

/// Credentials for the Cloudflare TURN key API.
#[derive(Clone)]
pub struct TurnConfig {
    pub app_id: String,
    pub api_token: String,
    pub ttl_secs: u64,
    pub endpoint: String,
}

impl TurnConfig {
    pub fn new(app_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_token: api_token.into(),
            ttl_secs: DEFAULT_TURN_TTL_SECS,
            endpoint: CLOUDFLARE_TURN_ENDPOINT.to_owned(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn credentials_url(&self) -> String {
        format!(
            "{}/{}/credentials/generate",
            self.endpoint.trim_end_matches('/'),
            self.app_id
        )
    }
}

impl fmt::Debug for TurnConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnConfig")
            .field("app_id", &self.app_id)
            .field("api_token", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    /// Minted TURN credentials. Without it the credential route serves
    /// `stun_servers`.
    pub turn: Option<TurnConfig>,
    pub stun_servers: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            turn: None,
            stun_servers: vec![DEFAULT_STUN_SERVER.to_owned()],
        }
    }
}

impl RelayConfig {
    /// Reads `BEACON_BIND`, `BEACON_STUN_SERVERS` (comma separated),
    /// `CF_TURN_APP_ID` and `CF_TURN_API_TOKEN`. Unset
    /// variables keep their defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(bind) = std::env::var("BEACON_BIND") {
            config.bind = bind
                .parse()
                .with_context(|| format!("BEACON_BIND is not a socket address: {bind}"))?;
        }

        if let Ok(servers) = std::env::var("BEACON_STUN_SERVERS") {
            config.stun_servers = servers
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
        }

        let app_id = std::env::var("CF_TURN_APP_ID").ok();
        let api_token = std::env::var("CF_TURN_API_TOKEN").ok();
        config.turn = match (app_id, api_token) {
            (Some(app_id), Some(api_token)) => Some(TurnConfig::new(app_id, api_token)),
            (None, None) => None,
            _ => anyhow::bail!(
                "CF_TURN_APP_ID and CF_TURN_API_TOKEN must be set together"
            ),
        };

        Ok(config)
    }

    pub fn credential_provider(&self) -> Arc<dyn CredentialProvider> {
        match &self.turn {
            Some(turn) => Arc::new(CloudflareTurn::new(turn.clone())),
            None => Arc::new(StaticIceServers::new(vec![IceServerConfig {
                urls: self.stun_servers.clone(),
                username: None,
                credential: None,
            }])),
        }
    }
}
