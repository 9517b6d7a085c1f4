use beacon_client::Role;
use beacon_core::PeerId;
use beacon_server::RoomManager;

use crate::integration::init_tracing;
use crate::utils::*;

#[tokio::test]
async fn simultaneous_dial_converges() {
    init_tracing();
    let rooms = RoomManager::new();
    let network = MockNetwork::new();

    let mut a = relay_client(&rooms, &network, "glare", "A")
        .await
        .expect("Failed to join relay");
    assert_eq!(wait_for_role(&mut a).await, Role::Polite);
    let mut b = relay_client(&rooms, &network, "glare", "B")
        .await
        .expect("Failed to join relay");
    assert_eq!(wait_for_role(&mut b).await, Role::Impolite);
    wait_for_peer_list(&mut a, &["B"]).await;

    let (dial_a, dial_b) = tokio::join!(a.connect_to_peer("B"), b.connect_to_peer("A"));
    dial_a.unwrap();
    dial_b.unwrap();

    wait_for_connected(&mut a, "B").await;
    wait_for_connected(&mut b, "A").await;

    a.send_to("B", "from A").await.unwrap();
    let (data, from) = wait_for_message(&mut b).await;
    assert_eq!(data, "from A");
    assert_eq!(from, PeerId::from("A"));

    b.send_to("A", "from B").await.unwrap();
    let (data, from) = wait_for_message(&mut a).await;
    assert_eq!(data, "from B");
    assert_eq!(from, PeerId::from("B"));
}
