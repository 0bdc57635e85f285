use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LobbyError {
    #[error("Max clients parameter is required")]
    MissingMaxClients,

    #[error("Invalid max_clients parameter")]
    InvalidMaxClients,

    #[error("Room ID parameter is required")]
    MissingRoomId,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full")]
    RoomFull,

    #[error("Only room host can delete the room")]
    NotHost,
}

impl LobbyError {
    pub fn status(&self) -> StatusCode {
        match self {
            LobbyError::MissingMaxClients
            | LobbyError::InvalidMaxClients
            | LobbyError::MissingRoomId => StatusCode::BAD_REQUEST,
            LobbyError::RoomNotFound => StatusCode::NOT_FOUND,
            LobbyError::RoomFull | LobbyError::NotHost => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for LobbyError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
