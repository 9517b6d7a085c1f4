use beacon_server::RoomManager;

use crate::integration::init_tracing;
use crate::utils::{TestMember, ids};

#[tokio::test]
async fn test_same_id_replaces_old_connection() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "r", "A");
    a.expect_peer_list().await;
    let mut b = TestMember::join(&rooms, "r", "B");
    a.expect_peer_list().await;
    b.expect_peer_list().await;

    let mut a2 = TestMember::join(&rooms, "r", "A");

    a.expect_closed().await;
    assert_eq!(b.expect_peer_list().await, ids(&["A"]));
    assert_eq!(a2.expect_peer_list().await, ids(&["B"]));
    assert_eq!(rooms.members("r").await, ids(&["B", "A"]));

    // The stale socket going away must not evict its replacement.
    drop(a);
    b.assert_silent().await;
    assert_eq!(rooms.members("r").await, ids(&["B", "A"]));

    let frame = r#"{"target":"A","hi":1}"#;
    b.send(frame);
    assert_eq!(a2.expect_frame().await, frame);
}

#[tokio::test]
async fn test_room_survives_replacement_of_only_member() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "solo", "A");
    a.expect_peer_list().await;

    let mut a2 = TestMember::join(&rooms, "solo", "A");
    a.expect_closed().await;
    assert!(a2.expect_peer_list().await.is_empty());

    drop(a);
    a2.assert_silent().await;
    assert!(rooms.contains_room("solo"));
}
