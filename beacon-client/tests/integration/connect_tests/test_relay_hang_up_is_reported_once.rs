use beacon_client::{ClientError, ConnectionEvent};

use crate::integration::init_tracing;
use crate::utils::*;

#[tokio::test]
async fn relay_hang_up_is_reported_once() {
    init_tracing();
    let network = MockNetwork::new();
    let (mut a, mut script) = scripted_client(&network, "A")
        .await
        .expect("Failed to start scripted client");

    script.peer_list(&[]);
    wait_for_role(&mut a).await;

    script.hang_up();
    wait_for(&mut a, |e| matches!(e, ConnectionEvent::SignalingClosed)).await;
    assert_no_event(&mut a, |e| matches!(e, ConnectionEvent::SignalingClosed)).await;

    // The handle is still alive; offers just cannot go anywhere.
    a.connect_to_peer("B").await.unwrap();
    let event = wait_for(&mut a, |e| matches!(e, ConnectionEvent::Error(_))).await;
    assert!(matches!(
        event,
        ConnectionEvent::Error(ClientError::SignalingClosed)
    ));
}
