use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use figboard_shared::{
    decode_figure_file, encode_figure_file, BoardCommand, BoardEvent, FigureFileError,
    HitResponse, Point,
};
use serde::{Deserialize, Serialize};

use crate::boards::{find_board, get_or_create_board, new_board_id, normalize_board_id};
use crate::logic::{apply_board_command, hit_test_board};
use crate::state::AppState;
use crate::storage::StorageError;

#[derive(Debug)]
pub enum ApiError {
    UnknownBoard,
    BadRequest(String),
    Rejected,
    Storage(StorageError),
}

impl From<FigureFileError> for ApiError {
    fn from(error: FigureFileError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        ApiError::Storage(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnknownBoard => (StatusCode::NOT_FOUND, "unknown board".to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Rejected => (StatusCode::BAD_REQUEST, "command rejected".to_string()),
            ApiError::Storage(error) => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct CreatedBoard {
    pub id: String,
}

#[derive(Deserialize)]
pub struct HitQuery {
    pub x: f64,
    pub y: f64,
}

pub async fn health_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn create_board_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreatedBoard>), ApiError> {
    let board_id = new_board_id();
    get_or_create_board(&state, &board_id).await?;
    Ok((StatusCode::CREATED, Json(CreatedBoard { id: board_id })))
}

pub async fn export_handler(
    Path(board_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let board_id = normalize_board_id(&board_id).ok_or(ApiError::UnknownBoard)?;
    let board = find_board(&state, &board_id)
        .await?
        .ok_or(ApiError::UnknownBoard)?;
    let body = encode_figure_file(&board.read().await.figures)
        .map_err(|error| ApiError::Storage(StorageError::Format(error)))?;
    let disposition = format!("attachment; filename=\"{board_id}.json\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn import_handler(
    Path(board_id): Path<String>,
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Vec<BoardEvent>>, ApiError> {
    let board_id = normalize_board_id(&board_id).ok_or(ApiError::UnknownBoard)?;
    let figures = decode_figure_file(&body)?;
    apply(&state, &board_id, BoardCommand::Load { figures }).await
}

pub async fn command_handler(
    Path(board_id): Path<String>,
    State(state): State<AppState>,
    Json(command): Json<BoardCommand>,
) -> Result<Json<Vec<BoardEvent>>, ApiError> {
    let board_id = normalize_board_id(&board_id).ok_or(ApiError::UnknownBoard)?;
    apply(&state, &board_id, command).await
}

pub async fn hit_handler(
    Path(board_id): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<HitQuery>,
) -> Result<Json<HitResponse>, ApiError> {
    let board_id = normalize_board_id(&board_id).ok_or(ApiError::UnknownBoard)?;
    let point = Point::new(query.x, query.y);
    if !point.is_finite() {
        return Err(ApiError::BadRequest("coordinates must be finite".to_string()));
    }
    let board = find_board(&state, &board_id)
        .await?
        .ok_or(ApiError::UnknownBoard)?;
    let board = board.read().await;
    Ok(Json(hit_test_board(&board, point, state.surface_width)))
}

async fn apply(
    state: &AppState,
    board_id: &str,
    command: BoardCommand,
) -> Result<Json<Vec<BoardEvent>>, ApiError> {
    let board = get_or_create_board(state, board_id).await?;
    let events = {
        let mut board = board.write().await;
        apply_board_command(&mut board, command)
    };
    match events {
        Some(events) => {
            tracing::debug!(board = board_id, events = events.len(), "command applied");
            Ok(Json(events))
        }
        None => {
            tracing::debug!(board = board_id, "command rejected");
            Err(ApiError::Rejected)
        }
    }
}
