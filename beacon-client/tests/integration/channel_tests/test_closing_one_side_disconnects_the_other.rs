use beacon_client::{ClientError, ConnectionEvent};
use beacon_core::PeerId;
use beacon_server::RoomManager;

use crate::integration::init_tracing;
use crate::utils::*;

#[tokio::test]
async fn closing_one_side_disconnects_the_other() {
    init_tracing();
    let rooms = RoomManager::new();
    let network = MockNetwork::new();
    let (mut a, mut b) = connected_pair(&rooms, &network, "bye").await;

    b.close().await;

    // The channel closing and the relay's new peer list race each other.
    let (mut disconnected, mut emptied) = (false, false);
    while !(disconnected && emptied) {
        match wait_for(&mut a, |e| {
            matches!(
                e,
                ConnectionEvent::PeerDisconnected(_) | ConnectionEvent::PeerList(_)
            )
        })
        .await
        {
            ConnectionEvent::PeerDisconnected(peer) => {
                assert_eq!(peer, PeerId::from("B"));
                disconnected = true;
            }
            ConnectionEvent::PeerList(peers) => emptied = peers.is_empty(),
            _ => unreachable!(),
        }
    }
    assert!(a.connected_peers().is_empty());
    assert!(matches!(a.send("anyone?").await, Err(ClientError::NoOpenChannel)));

    // The closed side reports its own loss, then the stream ends.
    let event = wait_for(&mut b, |e| matches!(e, ConnectionEvent::PeerDisconnected(_))).await;
    assert!(matches!(event, ConnectionEvent::PeerDisconnected(peer) if peer == PeerId::from("A")));
    while b.next_event().await.is_some() {}
    assert!(matches!(b.send("late").await, Err(ClientError::Closed)));
}
