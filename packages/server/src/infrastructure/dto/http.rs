//! HTTP API request/response DTOs for the room endpoints.

use serde::{Deserialize, Serialize};

/// Request body for room creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: Option<String>,
    pub language: Option<String>,
}

/// Response for room creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
}

/// Request body for the pre-join check
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub username: String,
}

/// Response for the pre-join check: room detail plus the assigned avatar color
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    pub room: RoomDetailDto,
    pub avatar_color: String,
}

/// Room detail for join/detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub active_language: String,
    pub created_at: String, // ISO 8601
}

/// Participant detail for room detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub connection_id: String,
    pub username: String,
    pub avatar_color: String,
}

/// Error body returned by the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
