use crate::lobby::{LobbyError, LobbyRegistry, LobbyRoom};
use axum::extract::{ConnectInfo, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use rendezvous_core::RoomId;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreateRoomQuery {
    pub max_clients: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    pub room_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomCreated {
    pub room_id: RoomId,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomStatus {
    pub status: String,
    pub room_id: RoomId,
}

/// `GET` answers with one room when `room_id` is given, all rooms otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RoomListing {
    One(LobbyRoom),
    All(Vec<LobbyRoom>),
}

/// Lobby API on `/v1/rooms`. Needs `ConnectInfo<SocketAddr>` to identify callers.
pub fn lobby_routes(registry: LobbyRegistry) -> Router {
    Router::new()
        .route(
            "/v1/rooms",
            get(list_rooms)
                .post(create_room)
                .put(join_room)
                .delete(delete_room),
        )
        .with_state(registry)
}

async fn create_room(
    State(registry): State<LobbyRegistry>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(query): Query<CreateRoomQuery>,
) -> Result<Json<RoomCreated>, LobbyError> {
    let max_clients = query
        .max_clients
        .filter(|raw| !raw.is_empty())
        .ok_or(LobbyError::MissingMaxClients)?
        .trim()
        .parse::<u32>()
        .map_err(|_| LobbyError::InvalidMaxClients)?;

    let room_id = registry.create(caller_ip(addr), max_clients);
    Ok(Json(RoomCreated { room_id }))
}

async fn join_room(
    State(registry): State<LobbyRegistry>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<RoomStatus>, LobbyError> {
    let room_id = parse_room_id(query)?;
    registry.join(&room_id, caller_ip(addr))?;

    Ok(Json(RoomStatus {
        status: "joined".to_owned(),
        room_id,
    }))
}

async fn delete_room(
    State(registry): State<LobbyRegistry>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<RoomStatus>, LobbyError> {
    let room_id = parse_room_id(query)?;
    registry.delete(&room_id, caller_ip(addr))?;

    Ok(Json(RoomStatus {
        status: "deleted".to_owned(),
        room_id,
    }))
}

async fn list_rooms(
    State(registry): State<LobbyRegistry>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<RoomListing>, LobbyError> {
    if query.room_id.as_deref().is_none_or(str::is_empty) {
        let rooms = registry.list();
        info!("Listing {} lobby rooms", rooms.len());
        return Ok(Json(RoomListing::All(rooms)));
    }

    let room_id = parse_room_id(query)?;
    registry
        .get(&room_id)
        .map(|room| Json(RoomListing::One(room)))
        .ok_or(LobbyError::RoomNotFound)
}

/// An id that is not a UUID cannot name any room.
fn parse_room_id(query: RoomQuery) -> Result<RoomId, LobbyError> {
    query
        .room_id
        .filter(|raw| !raw.is_empty())
        .ok_or(LobbyError::MissingRoomId)?
        .parse()
        .map_err(|_| LobbyError::RoomNotFound)
}

fn caller_ip(addr: SocketAddr) -> IpAddr {
    addr.ip().to_canonical()
}
