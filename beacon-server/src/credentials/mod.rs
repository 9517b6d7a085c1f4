mod cloudflare;
mod handler;
mod static_servers;

pub use cloudflare::CloudflareTurn;
pub use handler::turn_credentials;
pub use static_servers::StaticIceServers;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use beacon_core::IceServerConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    /// The credential service answered with a failure. Relayed to the client
    /// as-is.
    #[error("credential service answered {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("credential request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl IntoResponse for CredentialError {
    fn into_response(self) -> Response {
        match self {
            CredentialError::Upstream { status, body } => (status, body).into_response(),
            CredentialError::Request(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
        }
    }
}

/// Source of the ICE servers handed to clients before they connect.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn ice_servers(&self) -> Result<Vec<IceServerConfig>, CredentialError>;
}
