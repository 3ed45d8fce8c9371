//! Membership checks gating every mutation.
//!
//! Access to a board means: the board exists and its organization has a
//! membership row for the user. Lists and cards resolve up to their board.

use crate::{
    domain::{Board, BoardId, Card, CardId, List, ListId, UserId},
    error::{KanbanError, Result},
    storage::Storage,
};

/// Fails with `Unauthorized` when there is no session user
pub fn require_user(user: Option<&UserId>) -> Result<&UserId> {
    match user {
        Some(user) if !user.as_str().is_empty() => Ok(user),
        _ => Err(KanbanError::Unauthorized),
    }
}

pub async fn can_access_board(store: &dyn Storage, user: &UserId, board: &BoardId) -> Result<bool> {
    match store.find_board(board).await? {
        Some(board) => store.is_member(&board.organization_id, user).await,
        None => Ok(false),
    }
}

/// Board-scoped check: a missing board and a board the user can't see both read as `NotFound`
pub async fn require_board(store: &dyn Storage, user: &UserId, board_id: &BoardId) -> Result<Board> {
    let board = store
        .find_board(board_id)
        .await?
        .ok_or_else(|| KanbanError::board_not_found(board_id))?;
    if !store.is_member(&board.organization_id, user).await? {
        log::warn!("User {} denied access to board {}", user, board_id);
        return Err(KanbanError::board_not_found(board_id));
    }
    Ok(board)
}

async fn board_of_list(store: &dyn Storage, list: &List) -> Result<Board> {
    store
        .find_board(&list.board_id)
        .await?
        .ok_or_else(|| KanbanError::board_not_found(&list.board_id))
}

async fn require_member(store: &dyn Storage, user: &UserId, board: &Board) -> Result<()> {
    if store.is_member(&board.organization_id, user).await? {
        Ok(())
    } else {
        log::warn!("User {} is not a member of board {}", user, board.id);
        Err(KanbanError::Forbidden)
    }
}

/// List-scoped check: `NotFound` for a missing list, `Forbidden` for a non-member
pub async fn require_list_access(
    store: &dyn Storage,
    user: &UserId,
    list_id: &ListId,
) -> Result<(List, Board)> {
    let list = store
        .find_list(list_id)
        .await?
        .ok_or_else(|| KanbanError::list_not_found(list_id))?;
    let board = board_of_list(store, &list).await?;
    require_member(store, user, &board).await?;
    Ok((list, board))
}

/// Card-scoped check: `NotFound` for a missing card, `Forbidden` for a non-member
pub async fn require_card_access(
    store: &dyn Storage,
    user: &UserId,
    card_id: &CardId,
) -> Result<(Card, Board)> {
    let card = store
        .find_card(card_id)
        .await?
        .ok_or_else(|| KanbanError::card_not_found(card_id))?;
    let list = store
        .find_list(&card.list_id)
        .await?
        .ok_or_else(|| KanbanError::list_not_found(&card.list_id))?;
    let board = board_of_list(store, &list).await?;
    require_member(store, user, &board).await?;
    Ok((card, board))
}
