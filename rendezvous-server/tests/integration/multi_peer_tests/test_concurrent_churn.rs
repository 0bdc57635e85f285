use rendezvous_core::{PeerId, RoomCode, SignalType};
use rendezvous_server::SignalingRouter;
use serde_json::json;

use crate::integration::init_tracing;
use crate::utils::TestPeer;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_connect_and_disconnect() {
    init_tracing();

    let router = SignalingRouter::new();

    let mut handles = Vec::new();
    for i in 0..40 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let room = format!("room-{}", i % 5);
            let mut peer = TestPeer::join(&router, &format!("peer-{}", i), &room)
                .await
                .unwrap();
            peer.signal(SignalType::Offer, &format!("peer-{}", (i + 5) % 40), json!({}))
                .unwrap();
            peer.disconnect().await.unwrap();
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert!(router.peers().is_empty());
    assert!(router.rooms().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_survivor_sees_consistent_room_under_churn() {
    init_tracing();

    let router = SignalingRouter::new();
    let mut host = TestPeer::join(&router, "host", "lobby").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let mut guest = TestPeer::join(&router, &format!("guest-{}", i), "lobby")
                .await
                .unwrap();
            guest.disconnect().await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut joined = 0;
    let mut left = 0;
    while joined + left < 40 {
        match host.recv().await.unwrap().kind {
            SignalType::PeerJoined => joined += 1,
            SignalType::PeerLeft => left += 1,
            other => panic!("unexpected {:?}", other),
        }
    }
    assert_eq!((joined, left), (20, 20));

    assert_eq!(
        router.rooms().get_room(&RoomCode::from("lobby")).unwrap().member_ids(),
        vec![PeerId::from("host")]
    );
    assert_eq!(router.peers().len(), 1);
}
