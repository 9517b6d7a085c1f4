use beacon_client::TransportEvent;
use beacon_core::{PeerId, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::*;

#[tokio::test]
async fn both_ends_announce_themselves() {
    init_tracing();
    let network = MockNetwork::new();
    let (mut a, mut script) = scripted_client(&network, "A")
        .await
        .expect("Failed to start scripted client");
    let (b, mut b_events) = network.spawn_peer();

    script.peer_list(&[]);
    wait_for_role(&mut a).await;
    a.connect_to_peer("B").await.unwrap();
    answer_next_offer(&mut script, &b, "B").await;

    let mut announced = None;
    while announced.is_none() {
        let event = tokio::time::timeout(WAIT, b_events.recv())
            .await
            .expect("Timed out waiting for the handshake")
            .expect("Mock peer event stream ended");
        if let TransportEvent::ChannelMessage(_, text) = event {
            announced = Some(SignalMessage::decode(&text).unwrap());
        }
    }
    assert_eq!(
        announced,
        Some(SignalMessage::identity(PeerId::from("A")))
    );
}
