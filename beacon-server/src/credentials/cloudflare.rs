use crate::config::TurnConfig;
use crate::credentials::{CredentialError, CredentialProvider};
use async_trait::async_trait;
use axum::http::StatusCode;
use beacon_core::IceServerConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Serialize)]
struct GenerateRequest {
    ttl: u64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(rename = "iceServers")]
    ice_servers: IceServerConfig,
}

/// Mints short-lived TURN credentials from Cloudflare's key API.
#[derive(Debug, Clone)]
pub struct CloudflareTurn {
    client: reqwest::Client,
    config: TurnConfig,
}

impl CloudflareTurn {
    pub fn new(config: TurnConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CredentialProvider for CloudflareTurn {
    async fn ice_servers(&self) -> Result<Vec<IceServerConfig>, CredentialError> {
        let url = self.config.credentials_url();
        debug!("Requesting TURN credentials from {}", url);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&GenerateRequest {
                ttl: self.config.ttl_secs,
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("TURN credential request failed ({}): {}", status, body);
            return Err(CredentialError::Upstream {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            });
        }

        let generated: GenerateResponse = res.json().await?;
        Ok(vec![generated.ice_servers])
    }
}
