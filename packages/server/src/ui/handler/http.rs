//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use terakoya_shared::time::{get_jst_timestamp, timestamp_to_jst_rfc3339};

use crate::{
    domain::{Room, RoomFactory, RoomId, RoomRepository, Timestamp},
    infrastructure::dto::http::{
        CreateRoomRequest, CreateRoomResponse, ErrorResponse, JoinRoomRequest, JoinRoomResponse,
        ParticipantDetailDto, RoomDetailDto,
    },
    ui::state::AppState,
};

/// Avatar colors assigned round-robin-by-hash at join
const AVATAR_COLORS: [&str; 6] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD",
];

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a room with a fresh id and default buffers
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), StatusCode> {
    let room = RoomFactory::create(
        request.name,
        request.language,
        Timestamp::new(get_jst_timestamp()),
    )
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    match state.repository.upsert(room).await {
        Ok(room) => {
            tracing::info!("Created room '{}' ('{}')", room.id, room.name);
            Ok((
                StatusCode::CREATED,
                Json(CreateRoomResponse {
                    room_id: room.id.into_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Failed to persist new room: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Pre-join check: validates the room exists and assigns an avatar color
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.username.is_empty() || request.room_id.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Username and room_id required",
        ));
    }

    let room_id = RoomId::new(request.room_id)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Username and room_id required"))?;

    let room = state
        .repository
        .find_by_room_id(&room_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load room '{}': {}", room_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        })?;

    let Some(room) = room else {
        return Err(error_response(StatusCode::NOT_FOUND, "Room not found"));
    };

    Ok(Json(JoinRoomResponse {
        room: to_room_detail(&room),
        avatar_color: pick_avatar_color(),
    }))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    let room = state
        .repository
        .find_by_room_id(&room_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load room '{}': {}", room_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    match room {
        Some(room) => Ok(Json(to_room_detail(&room))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

fn to_room_detail(room: &Room) -> RoomDetailDto {
    RoomDetailDto {
        id: room.id.as_str().to_string(),
        name: room.name.clone(),
        participants: room
            .participants
            .iter()
            .map(|p| ParticipantDetailDto {
                connection_id: p.connection_id.as_str().to_string(),
                username: p.username.as_str().to_string(),
                avatar_color: p.avatar_color.clone(),
            })
            .collect(),
        active_language: room.active_language.clone(),
        created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
    }
}

/// Derive a palette index from a fresh UUID (stable-per-assignment,
/// uniform over the palette)
fn pick_avatar_color() -> String {
    let hash = uuid::Uuid::new_v4().as_u128();
    let index = (hash % AVATAR_COLORS.len() as u128) as usize;
    AVATAR_COLORS[index].to_string()
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}
