use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};

use super::{api_error, current_user, ApiResult, SuccessResponse};
use crate::{
    domain::{BoardId, BoardWithLists, List, ListId},
    service::{self, parse_body, CreateListRequest, ReorderListsRequest},
    state::AppState,
};

pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<BoardWithLists>> {
    const TARGET: &str = "kanban.api.get_board";
    let user = current_user(&headers, TARGET)?;

    let board = service::get_board(state.storage.as_ref(), &user, &BoardId::from(board_id))
        .await
        .map_err(api_error(TARGET))?;
    Ok(Json(board))
}

pub async fn create_list(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<List>)> {
    const TARGET: &str = "kanban.api.create_list";
    let user = current_user(&headers, TARGET)?;
    let request: CreateListRequest = parse_body(&body).map_err(api_error(TARGET))?;

    let list = service::create_list(
        state.storage.as_ref(),
        &user,
        &BoardId::from(board_id),
        &request,
    )
    .await
    .map_err(api_error(TARGET))?;
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn reorder_lists(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<SuccessResponse>> {
    const TARGET: &str = "kanban.api.reorder_lists";
    let user = current_user(&headers, TARGET)?;
    let request: ReorderListsRequest = parse_body(&body).map_err(api_error(TARGET))?;

    service::reorder_lists(
        state.storage.as_ref(),
        &user,
        &BoardId::from(board_id),
        &request,
    )
    .await
    .map_err(api_error(TARGET))?;
    Ok(SuccessResponse::ok())
}

pub async fn delete_list(
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<SuccessResponse>> {
    const TARGET: &str = "kanban.api.delete_list";
    let user = current_user(&headers, TARGET)?;

    service::delete_list(
        state.storage.as_ref(),
        &user,
        &BoardId::from(board_id),
        &ListId::from(list_id),
    )
    .await
    .map_err(api_error(TARGET))?;
    Ok(SuccessResponse::ok())
}
