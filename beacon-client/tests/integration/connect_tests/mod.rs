mod test_unreachable_relay_falls_back_to_configured_servers;
mod test_two_clients_connect_through_a_real_relay;
mod test_relay_hang_up_is_reported_once;

use beacon_core::IceServerConfig;

fn turn_servers() -> Vec<IceServerConfig> {
    vec![
        IceServerConfig::stun("stun:stun.cloudflare.com:3478"),
        IceServerConfig {
            urls: vec!["turn:turn.example.org:3478?transport=udp".to_owned()],
            username: Some("user".to_owned()),
            credential: Some("secret".to_owned()),
        },
    ]
}
