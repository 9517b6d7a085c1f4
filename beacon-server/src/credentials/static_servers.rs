use crate::credentials::{CredentialError, CredentialProvider};
use async_trait::async_trait;
use beacon_core::IceServerConfig;

/// Serves a fixed list, for deployments without a TURN account.
#[derive(Debug, Clone, Default)]
pub struct StaticIceServers {
    servers: Vec<IceServerConfig>,
}

impl StaticIceServers {
    pub fn new(servers: Vec<IceServerConfig>) -> Self {
        Self { servers }
    }
}

#[async_trait]
impl CredentialProvider for StaticIceServers {
    async fn ice_servers(&self) -> Result<Vec<IceServerConfig>, CredentialError> {
        Ok(self.servers.clone())
    }
}
