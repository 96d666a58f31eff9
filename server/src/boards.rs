use std::sync::Arc;

use figboard_shared::Figure;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::logic::sanitize_figures;
use crate::state::{AppState, Board};
use crate::storage::{Storage, StorageError};

pub fn new_board_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn normalize_board_id(value: &str) -> Option<String> {
    let parsed = Uuid::parse_str(value).ok()?;
    Some(parsed.to_string())
}

/// Board for a mutating request. A board with no stored file starts empty;
/// any other storage failure is returned so the stored file is never replaced
/// by an empty board.
pub async fn get_or_create_board(
    state: &AppState,
    board_id: &str,
) -> Result<Arc<RwLock<Board>>, StorageError> {
    if let Some(board) = state.boards.read().await.get(board_id).cloned() {
        return Ok(board);
    }
    let figures = match state.storage.load_board(board_id).await {
        Ok(figures) => {
            tracing::info!(board = board_id, figures = figures.len(), "board loaded");
            figures
        }
        Err(StorageError::NotFound) => {
            tracing::info!(board = board_id, "board created");
            Vec::new()
        }
        Err(error) => {
            tracing::error!(board = board_id, %error, "board unreadable");
            return Err(error);
        }
    };
    let board = Arc::new(RwLock::new(Board::new(sanitize_figures(figures))));
    let mut boards = state.boards.write().await;
    let entry = boards
        .entry(board_id.to_string())
        .or_insert_with(|| board.clone());
    Ok(entry.clone())
}

/// Board for a read-only request. Never adds to the open-board map: a board
/// only on disk is loaded into a detached snapshot, a missing one is `None`.
pub async fn find_board(
    state: &AppState,
    board_id: &str,
) -> Result<Option<Arc<RwLock<Board>>>, StorageError> {
    if let Some(board) = state.boards.read().await.get(board_id).cloned() {
        return Ok(Some(board));
    }
    match state.storage.load_board(board_id).await {
        Ok(figures) => Ok(Some(Arc::new(RwLock::new(Board::new(sanitize_figures(
            figures,
        )))))),
        Err(StorageError::NotFound) => Ok(None),
        Err(error) => {
            tracing::error!(board = board_id, %error, "board unreadable");
            Err(error)
        }
    }
}

pub async fn save_board(state: &AppState, board_id: &str, figures: &[Figure]) -> bool {
    match state.storage.save_board(board_id, figures).await {
        Ok(()) => {
            tracing::debug!(board = board_id, figures = figures.len(), "board saved");
            true
        }
        Err(error) => {
            tracing::error!(board = board_id, %error, "failed to save board");
            false
        }
    }
}

/// Writes every dirty board. A board whose save fails stays dirty.
pub async fn flush_dirty_boards(state: &AppState) -> usize {
    let boards = {
        let boards = state.boards.read().await;
        boards
            .iter()
            .map(|(board_id, board)| (board_id.clone(), board.clone()))
            .collect::<Vec<_>>()
    };
    let mut saved = 0;
    for (board_id, board) in boards {
        let maybe_figures = {
            let mut board = board.write().await;
            if !board.dirty {
                None
            } else {
                board.dirty = false;
                Some(board.figures.clone())
            }
        };
        if let Some(figures) = maybe_figures {
            if save_board(state, &board_id, &figures).await {
                saved += 1;
            } else {
                board.write().await.dirty = true;
            }
        }
    }
    saved
}
