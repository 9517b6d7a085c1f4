use beacon_client::{ConnectionEvent, DataChannel, Role};
use beacon_core::{PeerId, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::*;

#[tokio::test]
async fn first_frame_must_be_the_identity_handshake() {
    init_tracing();
    let network = MockNetwork::new();
    let (mut a, mut script) = scripted_client(&network, "A")
        .await
        .expect("Failed to start scripted client");
    let (b, mut b_events) = network.spawn_peer();

    script.peer_list(&[]);
    assert_eq!(wait_for_role(&mut a).await, Role::Polite);

    a.connect_to_peer("B").await.unwrap();
    answer_next_offer(&mut script, &b, "B").await;

    let channel = next_remote_channel(&mut b_events).await;
    wait_for(&mut a, |e| matches!(e, ConnectionEvent::DataChannel { .. })).await;

    channel.send_text("hello before handshake").await.unwrap();
    assert_no_event(&mut a, |e| {
        matches!(
            e,
            ConnectionEvent::Message { .. } | ConnectionEvent::PeerConnected(_)
        )
    })
    .await;
    assert!(a.connected_peers().is_empty());

    let handshake = SignalMessage::identity(PeerId::from("B")).encode().unwrap();
    channel.send_text(&handshake).await.unwrap();
    wait_for_connected(&mut a, "B").await;

    channel.send_text("hi").await.unwrap();
    let (data, from) = wait_for_message(&mut a).await;
    assert_eq!(data, "hi");
    assert_eq!(from, PeerId::from("B"));

    a.send_to("B", "back").await.unwrap();
}
