use crate::models::{MessageRequest, MessageResponse, SessionResponse};
use crate::voice::{room_name, VoiceTokens};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use drive_thru_sdk::order::OrderedItem;
use drive_thru_sdk::receipt::Receipt;
use drive_thru_sdk::session::{DriveThruSession, SessionManager, SessionReport};
use drive_thru_sdk::Error as SdkError;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

pub struct AppState {
    pub sessions: SessionManager,
    pub voice: Option<VoiceTokens>,
}

impl AppState {
    pub fn new(sessions: SessionManager, voice: Option<VoiceTokens>) -> Self {
        Self { sessions, voice }
    }

    async fn session(&self, id: &str) -> Result<Arc<DriveThruSession>, ApiError> {
        self.sessions
            .get_session(id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("session {}", id)))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<SdkError> for ApiError {
    fn from(e: SdkError) -> Self {
        match e {
            SdkError::SessionNotFound(id) => ApiError::NotFound(format!("session {}", id)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn health() -> impl IntoResponse {
    "OK"
}

pub async fn alive() -> impl IntoResponse {
    Json(json!({
        "status": "ok"
    }))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions.create_session().await?;
    let room = room_name(&session.id);

    let token = match &state.voice {
        Some(voice) => Some(
            voice
                .join_token(&room, &format!("customer-{}", session.id))
                .map_err(|e| ApiError::Internal(format!("failed to mint join token: {}", e)))?,
        ),
        None => None,
    };

    Ok(Json(SessionResponse {
        id: session.id.clone(),
        status: "created".to_string(),
        room,
        token,
        livekit_url: state.voice.as_ref().map(|v| v.url().to_string()),
    }))
}

pub async fn submit_message(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let session = state.session(&id).await?;
    let response = session.handle_turn(&payload.content).await?;
    Ok(Json(MessageResponse { response }))
}

pub async fn get_order(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderedItem>>, ApiError> {
    let session = state.session(&id).await?;
    Ok(Json(session.desk().list_order_items().await))
}

pub async fn get_receipt(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Receipt>, ApiError> {
    let session = state.session(&id).await?;
    Ok(Json(session.desk().receipt().await))
}

pub async fn end_session(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionReport>, ApiError> {
    let report = state.sessions.end_session(&id).await?;
    Ok(Json(report))
}
