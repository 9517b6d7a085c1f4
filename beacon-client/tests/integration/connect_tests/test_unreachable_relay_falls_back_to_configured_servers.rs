use beacon_client::ice::resolve_ice_servers;
use beacon_client::{ClientError, ConnectOptions, fetch_ice_servers};

use crate::integration::init_tracing;
use crate::utils::*;
use super::turn_servers;

#[tokio::test]
async fn unreachable_relay_falls_back_to_configured_servers() {
    init_tracing();
    assert!(matches!(
        fetch_ice_servers("127.0.0.1:1", "room").await,
        Err(ClientError::Http(_))
    ));

    let options = ConnectOptions::new("127.0.0.1:1", "room");
    assert_eq!(resolve_ice_servers(&options).await, options.ice_servers);

    let options = options.fetch_ice_servers(false).with_ice_servers(turn_servers());
    assert_eq!(resolve_ice_servers(&options).await, turn_servers());
}
