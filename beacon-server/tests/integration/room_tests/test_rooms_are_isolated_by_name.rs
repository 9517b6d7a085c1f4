use beacon_core::RoomId;
use beacon_server::RoomManager;

use crate::integration::init_tracing;
use crate::utils::{TestMember, ids};

#[tokio::test]
async fn test_rooms_are_isolated_by_name() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "lobby", "A");
    assert_eq!(a.handle.room(), &RoomId::from("lobby"));
    assert!(a.expect_peer_list().await.is_empty());

    let mut lone = TestMember::join(&rooms, "attic", "C");
    assert!(lone.expect_peer_list().await.is_empty());

    let mut b = TestMember::join(&rooms, "lobby", "B");
    assert_eq!(a.expect_peer_list().await, ids(&["B"]));
    assert_eq!(b.expect_peer_list().await, ids(&["A"]));

    b.send(r#"{"description":{"type":"offer","sdp":"x"}}"#);
    assert!(a.expect_frame().await.contains("offer"));

    lone.assert_silent().await;
    assert_eq!(rooms.room_count(), 2);
    assert_eq!(rooms.members("attic").await, ids(&["C"]));
    assert_eq!(rooms.members("lobby").await, ids(&["A", "B"]));
}
