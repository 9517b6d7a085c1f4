use beacon_server::RoomManager;

use crate::integration::init_tracing;
use crate::utils::{TestMember, ids};

#[tokio::test]
async fn test_first_member_sees_empty_list() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "lobby", "A");

    assert!(a.expect_peer_list().await.is_empty());
}

#[tokio::test]
async fn test_every_member_gets_list_without_itself() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "lobby", "A");
    assert_eq!(a.expect_peer_list().await, ids(&[]));

    let mut b = TestMember::join(&rooms, "lobby", "B");
    assert_eq!(a.expect_peer_list().await, ids(&["B"]));
    assert_eq!(b.expect_peer_list().await, ids(&["A"]));

    let mut c = TestMember::join(&rooms, "lobby", "C");
    assert_eq!(a.expect_peer_list().await, ids(&["B", "C"]));
    assert_eq!(b.expect_peer_list().await, ids(&["A", "C"]));
    assert_eq!(c.expect_peer_list().await, ids(&["A", "B"]));

    assert_eq!(rooms.members("lobby").await, ids(&["A", "B", "C"]));
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "x", "A");
    let mut b = TestMember::join(&rooms, "y", "B");

    assert!(a.expect_peer_list().await.is_empty());
    assert!(b.expect_peer_list().await.is_empty());

    a.send(r#"{"candidate":{"candidate":"c"}}"#);
    b.assert_silent().await;
    assert_eq!(rooms.room_count(), 2);
}
