use beacon_client::{Connection, ConnectOptions, Role};
use beacon_core::PeerId;

use crate::integration::init_tracing;
use crate::utils::*;
use super::turn_servers;

#[tokio::test]
async fn two_clients_connect_through_a_real_relay() {
    init_tracing();
    let relay = RelayServer::start(turn_servers())
        .await
        .expect("Failed to start relay");
    let network = MockNetwork::new();

    let options = |id: &str| {
        ConnectOptions::new(relay.host(), "lobby")
            .with_peer_id(id)
            .with_rtc(network.provider())
    };

    let mut a = Connection::connect(options("A")).await.unwrap();
    assert_eq!(wait_for_role(&mut a).await, Role::Polite);
    let mut b = Connection::connect(options("B")).await.unwrap();
    assert_eq!(wait_for_role(&mut b).await, Role::Impolite);
    wait_for_peer_list(&mut a, &["B"]).await;

    // Both peer connections were built with what the relay handed out.
    for peer in network.peers() {
        assert_eq!(peer.ice_servers(), turn_servers());
    }

    b.connect_to_peer("A").await.unwrap();
    wait_for_connected(&mut a, "B").await;
    wait_for_connected(&mut b, "A").await;

    b.send("hello").await.unwrap();
    let (data, from) = wait_for_message(&mut a).await;
    assert_eq!(data, "hello");
    assert_eq!(from, PeerId::from("B"));

    a.close().await;
    b.close().await;
}
