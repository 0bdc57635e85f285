use crate::signaling::{ConnectParams, SignalingRouter};
use crate::transport::{PeerChannel, WsSource, spawn_writer};
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound for flushing queued messages after the router is done.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket endpoint: `GET /ws?peer_id=<id>&room=<code>`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(router): State<SignalingRouter>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, params, router))
}

async fn handle_socket(socket: WebSocket, params: ConnectParams, router: SignalingRouter) {
    info!("New WebSocket connection: {:?}", params.peer_id);

    let (sink, stream) = socket.split();
    let (channel, outbound) = PeerChannel::new();
    let mut writer = spawn_writer(sink, outbound);

    if let Err(e) = router.serve(params, channel, WsSource::new(stream)).await {
        debug!("Connection refused: {}", e);
    }

    // The router closed the channel, so the writer finishes once the queue drains.
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer)
        .await
        .is_err()
    {
        writer.abort();
    }
}
