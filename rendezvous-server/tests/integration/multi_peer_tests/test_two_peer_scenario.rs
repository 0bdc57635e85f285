use rendezvous_core::{PeerId, RoomCode, SignalType};
use rendezvous_server::SignalingRouter;
use serde_json::json;

use crate::integration::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, TestPeer, wait_until};

#[tokio::test]
async fn test_two_peers_negotiate_and_leave() {
    init_tracing();

    let router = SignalingRouter::new();
    let r1 = RoomCode::from("R1");

    let mut a = TestPeer::join(&router, "A", "R1").await.unwrap();
    let mut b = TestPeer::join(&router, "B", "R1").await.unwrap();

    let joined = a.recv().await.unwrap();
    assert_eq!(joined.kind, SignalType::PeerJoined);
    assert_eq!(joined.from, PeerId::from("B"));
    assert!(a.is_silent().await, "exactly one peer_joined");

    let payload = json!({ "sdp": "X" });
    b.signal(SignalType::Offer, "A", payload.clone()).unwrap();
    let offer = a.recv().await.unwrap();
    assert_eq!(offer.kind, SignalType::Offer);
    assert_eq!(offer.from, PeerId::from("B"));
    assert_eq!(offer.to, PeerId::from("A"));
    assert_eq!(offer.payload, payload);

    b.disconnect().await.unwrap();
    let left = a.recv().await.unwrap();
    assert_eq!(left.kind, SignalType::PeerLeft);
    assert_eq!(left.from, PeerId::from("B"));
    assert!(a.is_silent().await, "exactly one peer_left");
    assert_eq!(
        router.rooms().get_room(&r1).unwrap().member_ids(),
        vec![PeerId::from("A")]
    );

    a.disconnect().await.unwrap();
    assert!(router.rooms().get_room(&r1).is_none());
    assert!(router.peers().is_empty());
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    init_tracing();

    let router = SignalingRouter::new();
    let mut a = TestPeer::join(&router, "A", "R1").await.unwrap();
    let mut b = TestPeer::join(&router, "B", "R2").await.unwrap();
    let mut c = TestPeer::join(&router, "C", "R1").await.unwrap();

    assert_eq!(a.recv().await.unwrap().from, PeerId::from("C"));
    assert!(b.is_silent().await);

    c.disconnect().await.unwrap();
    assert_eq!(a.recv().await.unwrap().kind, SignalType::PeerLeft);
    assert!(b.is_silent().await);

    // Point-to-point routing is registry-wide, not limited to the sender's room.
    b.signal(SignalType::Offer, "A", json!({ "sdp": "cross" })).unwrap();
    assert_eq!(a.recv().await.unwrap().from, PeerId::from("B"));
}

#[tokio::test]
async fn test_reconnect_with_same_id_keeps_new_connection() {
    init_tracing();

    let router = SignalingRouter::new();
    let mut watcher = TestPeer::join(&router, "W", "R1").await.unwrap();
    let mut stale = TestPeer::join(&router, "A", "R1").await.unwrap();
    let mut fresh = TestPeer::join(&router, "A", "R1").await.unwrap();
    watcher.recv().await.unwrap();
    watcher.recv().await.unwrap();

    stale.disconnect().await.unwrap();

    let id = PeerId::from("A");
    assert!(router.peers().contains(&id));
    assert!(router.rooms().get_room(&"R1".into()).unwrap().contains(&id));

    watcher.signal(SignalType::Offer, "A", json!({})).unwrap();
    assert_eq!(fresh.recv().await.unwrap().kind, SignalType::Offer);
}

#[tokio::test]
async fn test_stale_connection_cannot_leave_for_successor() {
    init_tracing();

    let router = SignalingRouter::new();
    let mut watcher = TestPeer::join(&router, "W", "R1").await.unwrap();
    let stale = TestPeer::join(&router, "A", "R1").await.unwrap();
    let mut fresh = TestPeer::join(&router, "A", "R1").await.unwrap();
    watcher.recv().await.unwrap();
    watcher.recv().await.unwrap();

    let id = PeerId::from("A");
    let r1 = RoomCode::from("R1");
    stale.signal(SignalType::LeaveRoom, "", json!(null)).unwrap();

    // Messages of one connection are dispatched in order, so once R9 exists
    // the stale leave_room has been handled.
    stale
        .signal(SignalType::JoinRoom, "", json!({ "room_code": "R9" }))
        .unwrap();
    let rooms = router.rooms().clone();
    assert!(
        wait_until(SIGNAL_TIMEOUT_MS, || rooms.get_room(&RoomCode::from("R9")).is_some()).await
    );

    assert!(rooms.get_room(&r1).unwrap().contains(&id));
    assert_eq!(router.peers().get(&id).unwrap().current_room(), Some(r1));
    assert!(watcher.is_silent().await);
    assert!(fresh.is_silent().await);
}
