use axum::{
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

mod boards;
mod cards;

use crate::{domain::UserId, error::KanbanError, service::require_user, state::AppState};

/// Header carrying the authenticated user id, set by the identity proxy
pub const USER_HEADER: &str = "x-user-id";

/// Axum REST API routes.
///
///   GET    /health                           -> liveness
///   GET    /boards/{boardId}                 -> board with lists and cards
///   POST   /boards/{boardId}/lists           -> create list at the end
///   PATCH  /boards/{boardId}/lists           -> reorder lists
///   DELETE /boards/{boardId}/lists/{listId}  -> delete list and its cards
///   POST   /lists/{listId}/cards             -> create card at the end
///   PATCH  /cards/reorder                    -> reorder cards
///   PATCH  /cards/{cardId}/move              -> move card to another list
///   DELETE /cards/{cardId}                   -> delete card and its images
///   GET    /cards/{cardId}/images            -> images in display order
///   PATCH  /cards/{cardId}/images/reorder    -> reorder images
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/boards/{board_id}", get(boards::get_board))
        .route(
            "/boards/{board_id}/lists",
            post(boards::create_list).patch(boards::reorder_lists),
        )
        .route(
            "/boards/{board_id}/lists/{list_id}",
            delete(boards::delete_list),
        )
        .route("/lists/{list_id}/cards", post(cards::create_card))
        .route("/cards/reorder", patch(cards::reorder_cards))
        .route("/cards/{card_id}/move", patch(cards::move_card))
        .route("/cards/{card_id}", delete(cards::delete_card))
        .route("/cards/{card_id}/images", get(cards::list_images))
        .route("/cards/{card_id}/images/reorder", patch(cards::reorder_images))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ── Shared types and helpers used across sub-modules ────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of a successful reorder or delete
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

pub fn status_for(err: &KanbanError) -> StatusCode {
    match err {
        KanbanError::Unauthorized => StatusCode::UNAUTHORIZED,
        KanbanError::Forbidden => StatusCode::FORBIDDEN,
        KanbanError::NotFound(_) => StatusCode::NOT_FOUND,
        KanbanError::BadInput(_) => StatusCode::BAD_REQUEST,
        KanbanError::Storage(_)
        | KanbanError::Io(_)
        | KanbanError::Serialization(_)
        | KanbanError::Config(_)
        | KanbanError::Request(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(target: &'static str) -> impl Fn(KanbanError) -> ApiError {
    move |err| {
        let status = status_for(&err);
        let error = match status {
            // store details stay in the log
            StatusCode::INTERNAL_SERVER_ERROR => {
                log_api_issue(status, target, err.to_string());
                "Internal error".to_string()
            }
            _ => {
                let error = err.to_string();
                log_api_issue(status, target, &error);
                error
            }
        };
        (status, Json(ErrorResponse { error }))
    }
}

/// Resolves the session user from [`USER_HEADER`]
fn current_user(headers: &HeaderMap, target: &'static str) -> ApiResult<UserId> {
    let user = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| UserId::from_str(value).ok());
    require_user(user.as_ref())
        .cloned()
        .map_err(api_error(target))
}

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}
