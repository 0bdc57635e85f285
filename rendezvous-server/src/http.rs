use crate::lobby::{LobbyRegistry, lobby_routes};
use crate::signaling::{SignalingRouter, ws_handler};
use axum::Router;
use axum::routing::get;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Signaling surface: `GET /ws?peer_id=<id>&room=<code>`.
pub fn signaling_routes(router: SignalingRouter) -> Router {
    with_http_layers(Router::new().route("/ws", get(ws_handler)).with_state(router))
}

/// Browser clients connect from other origins, so CORS is wide open.
pub fn with_http_layers(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

pub async fn serve_signaling<F>(
    listener: TcpListener,
    router: SignalingRouter,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, signaling_routes(router))
        .with_graceful_shutdown(shutdown)
        .await
}

/// The lobby identifies callers by address, hence the connect info.
pub async fn serve_lobby<F>(
    listener: TcpListener,
    registry: LobbyRegistry,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = with_http_layers(lobby_routes(registry));

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
