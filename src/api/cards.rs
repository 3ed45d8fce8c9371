use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};

use super::{api_error, current_user, ApiResult, SuccessResponse};
use crate::{
    domain::{Card, CardId, CardImage, ListId},
    service::{
        self, parse_body, CreateCardRequest, MoveCardRequest, ReorderCardsRequest,
        ReorderImagesRequest,
    },
    state::AppState,
};

pub async fn create_card(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Card>)> {
    const TARGET: &str = "kanban.api.create_card";
    let user = current_user(&headers, TARGET)?;
    let request: CreateCardRequest = parse_body(&body).map_err(api_error(TARGET))?;

    let card = service::create_card(
        state.storage.as_ref(),
        &user,
        &ListId::from(list_id),
        &request,
    )
    .await
    .map_err(api_error(TARGET))?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn reorder_cards(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<SuccessResponse>> {
    const TARGET: &str = "kanban.api.reorder_cards";
    let user = current_user(&headers, TARGET)?;
    let request: ReorderCardsRequest = parse_body(&body).map_err(api_error(TARGET))?;

    service::reorder_cards(state.storage.as_ref(), &user, &request)
        .await
        .map_err(api_error(TARGET))?;
    Ok(SuccessResponse::ok())
}

pub async fn move_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Card>> {
    const TARGET: &str = "kanban.api.move_card";
    let user = current_user(&headers, TARGET)?;
    let request: MoveCardRequest = parse_body(&body).map_err(api_error(TARGET))?;

    let card = service::move_card(
        state.storage.as_ref(),
        &user,
        &CardId::from(card_id),
        &request,
    )
    .await
    .map_err(api_error(TARGET))?;
    Ok(Json(card))
}

pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<SuccessResponse>> {
    const TARGET: &str = "kanban.api.delete_card";
    let user = current_user(&headers, TARGET)?;

    service::delete_card(state.storage.as_ref(), &user, &CardId::from(card_id))
        .await
        .map_err(api_error(TARGET))?;
    Ok(SuccessResponse::ok())
}

pub async fn list_images(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<CardImage>>> {
    const TARGET: &str = "kanban.api.list_images";
    let user = current_user(&headers, TARGET)?;

    let images = service::list_images(state.storage.as_ref(), &user, &CardId::from(card_id))
        .await
        .map_err(api_error(TARGET))?;
    Ok(Json(images))
}

pub async fn reorder_images(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<SuccessResponse>> {
    const TARGET: &str = "kanban.api.reorder_images";
    let user = current_user(&headers, TARGET)?;
    let request: ReorderImagesRequest = parse_body(&body).map_err(api_error(TARGET))?;

    service::reorder_images(
        state.storage.as_ref(),
        &user,
        &CardId::from(card_id),
        &request,
    )
    .await
    .map_err(api_error(TARGET))?;
    Ok(SuccessResponse::ok())
}
