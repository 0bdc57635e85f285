use rendezvous_core::{PeerId, SignalMessage, SignalType};
use rendezvous_server::SignalingRouter;
use serde_json::{Value, json};

use crate::integration::init_tracing;
use crate::utils::TestPeer;

#[tokio::test]
async fn test_negotiation_messages_are_forwarded_verbatim() {
    init_tracing();

    let router = SignalingRouter::new();
    let mut alice = TestPeer::join(&router, "alice", "R1").await.unwrap();
    let mut bob = TestPeer::join(&router, "bob", "R1").await.unwrap();
    alice.recv().await.unwrap();

    let offer = json!({ "sdp": "v=0", "nested": { "a": [1, 2, 3] } });
    bob.signal(SignalType::Offer, "alice", offer.clone()).unwrap();
    let received = alice.recv().await.unwrap();
    assert_eq!(
        received,
        SignalMessage::new(
            SignalType::Offer,
            PeerId::from("bob"),
            PeerId::from("alice"),
            offer
        )
    );

    alice
        .signal(SignalType::Answer, "bob", json!({ "sdp": "answer" }))
        .unwrap();
    assert_eq!(bob.recv().await.unwrap().kind, SignalType::Answer);

    let candidate = json!("candidate:1 1 UDP 2122252543 10.0.0.2 50000 typ host");
    bob.signal(SignalType::IceCandidate, "alice", candidate.clone())
        .unwrap();
    let received = alice.recv().await.unwrap();
    assert_eq!(received.kind, SignalType::IceCandidate);
    assert_eq!(received.payload, candidate);

    assert!(bob.is_silent().await, "sender gets no echo");
}

#[tokio::test]
async fn test_raw_envelope_survives_forwarding() {
    init_tracing();

    let router = SignalingRouter::new();
    let mut alice = TestPeer::join(&router, "alice", "R1").await.unwrap();
    let bob = TestPeer::join(&router, "bob", "R1").await.unwrap();
    alice.recv().await.unwrap();

    let raw = r#"{"type":"offer","from":"bob","to":"alice","payload":"{\"sdp\":\"v=0\"}"}"#;
    bob.send_raw(raw).unwrap();

    let received = serde_json::to_value(alice.recv().await.unwrap()).unwrap();
    assert_eq!(received, serde_json::from_str::<Value>(raw).unwrap());
}

#[tokio::test]
async fn test_unroutable_signals_are_dropped_silently() {
    init_tracing();

    let router = SignalingRouter::new();
    let mut alice = TestPeer::join(&router, "alice", "R1").await.unwrap();
    let mut bob = TestPeer::join(&router, "bob", "R1").await.unwrap();
    alice.recv().await.unwrap();

    // Unknown recipient, missing recipient, unknown tag, spoofed announcement.
    bob.signal(SignalType::Offer, "nobody", json!({})).unwrap();
    bob.signal(SignalType::Answer, "", json!({})).unwrap();
    bob.signal(SignalType::Unrecognized("renegotiate".into()), "alice", json!({}))
        .unwrap();
    bob.signal(SignalType::PeerLeft, "alice", json!({ "peer_id": "bob" }))
        .unwrap();

    assert!(alice.is_silent().await);
    assert!(bob.is_silent().await, "sender receives no routing errors");

    // The connection is still usable afterwards.
    bob.signal(SignalType::Offer, "alice", json!({ "sdp": "v=0" }))
        .unwrap();
    assert_eq!(alice.recv().await.unwrap().kind, SignalType::Offer);
}

#[tokio::test]
async fn test_send_to_closed_recipient_does_not_affect_sender() {
    init_tracing();

    let router = SignalingRouter::new();
    let alice = TestPeer::join(&router, "alice", "R1").await.unwrap();
    let mut bob = TestPeer::join(&router, "bob", "R1").await.unwrap();

    // Offers racing alice's teardown fail quietly on the server side.
    drop(alice);

    bob.signal(SignalType::Offer, "alice", json!({})).unwrap();
    bob.signal(SignalType::Offer, "alice", json!({})).unwrap();
    assert!(bob.is_silent().await);
    assert!(router.peers().contains(&PeerId::from("bob")));
}
