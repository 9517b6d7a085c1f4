use crate::error::ClientError;
use crate::options::{ConnectOptions, credentials_url};
use beacon_core::IceServerConfig;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct IceServersBody {
    #[serde(rename = "iceServers")]
    ice_servers: Vec<IceServerConfig>,
}

/// Ask the relay's credential route for ICE servers.
pub async fn fetch_ice_servers(host: &str, room: &str) -> Result<Vec<IceServerConfig>, ClientError> {
    let url = credentials_url(host, room)?;
    debug!("Fetching ICE servers from {}", url);

    let body: IceServersBody = reqwest::get(url)
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(body.ice_servers)
}

/// ICE servers for a new connection. Fetch failures fall back to the
/// configured list.
pub async fn resolve_ice_servers(options: &ConnectOptions) -> Vec<IceServerConfig> {
    if !options.fetch_ice_servers {
        return options.ice_servers.clone();
    }

    match fetch_ice_servers(&options.host, options.room.as_str()).await {
        Ok(servers) if !servers.is_empty() => servers,
        Ok(_) => {
            warn!("Relay returned no ICE servers, using defaults");
            options.ice_servers.clone()
        }
        Err(e) => {
            warn!("Failed to fetch ICE servers, using defaults: {}", e);
            options.ice_servers.clone()
        }
    }
}
