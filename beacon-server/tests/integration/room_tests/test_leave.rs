use beacon_server::RoomManager;

use crate::integration::init_tracing;
use crate::utils::{TestMember, ids};

#[tokio::test]
async fn test_remaining_members_get_updated_list() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "r", "A");
    a.expect_peer_list().await;
    let mut b = TestMember::join(&rooms, "r", "B");
    a.expect_peer_list().await;
    b.expect_peer_list().await;
    let mut c = TestMember::join(&rooms, "r", "C");
    a.expect_peer_list().await;
    b.expect_peer_list().await;
    c.expect_peer_list().await;

    drop(b);

    assert_eq!(a.expect_peer_list().await, ids(&["C"]));
    assert_eq!(c.expect_peer_list().await, ids(&["A"]));
}

#[tokio::test]
async fn test_leave_is_idempotent() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "r", "A");
    a.expect_peer_list().await;
    let mut b = TestMember::join(&rooms, "r", "B");
    a.expect_peer_list().await;
    b.expect_peer_list().await;

    b.handle.leave();
    b.handle.leave();
    assert_eq!(a.expect_peer_list().await, ids(&[]));
    b.expect_closed().await;

    drop(b);
    a.assert_silent().await;
    assert_eq!(rooms.members("r").await, ids(&["A"]));
}

#[tokio::test]
async fn test_frames_after_leave_are_dropped() {
    init_tracing();

    let rooms = RoomManager::new();
    let mut a = TestMember::join(&rooms, "r", "A");
    a.expect_peer_list().await;
    let mut b = TestMember::join(&rooms, "r", "B");
    a.expect_peer_list().await;
    b.expect_peer_list().await;

    b.handle.leave();
    assert_eq!(a.expect_peer_list().await, ids(&[]));

    b.send(r#"{"target":"A","late":true}"#);
    a.assert_silent().await;
}
