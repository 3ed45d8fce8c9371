//! The reorder/move protocol. All access and validation checks complete
//! before the single store write, so a rejected request writes nothing.
//!
//! There is no version token: overlapping reorders of the same collection
//! are last-writer-wins per row.

use crate::{
    domain::{BoardId, Card, CardId, CardImage, ListId, UserId},
    error::{KanbanError, Result},
    service::{
        access,
        requests::{
            MoveCardRequest, ReorderCardsRequest, ReorderImagesRequest, ReorderListsRequest,
        },
    },
    storage::Storage,
};
use std::collections::{HashMap, HashSet};

/// Rewrites the order of lists on one board
pub async fn reorder_lists(
    store: &dyn Storage,
    user: &UserId,
    board_id: &BoardId,
    request: &ReorderListsRequest,
) -> Result<()> {
    request.validate()?;
    access::require_board(store, user, board_id).await?;

    for update in &request.lists {
        let belongs = store
            .find_list(&update.id)
            .await?
            .is_some_and(|list| &list.board_id == board_id);
        if !belongs {
            return Err(KanbanError::list_not_found(&update.id));
        }
    }

    store.set_list_orders(&request.lists).await?;
    log::info!(
        "Reordered {} lists on board {} for {}",
        request.lists.len(),
        board_id,
        user
    );
    Ok(())
}

/// Rewrites the order of cards; every card's board is access-checked first
pub async fn reorder_cards(
    store: &dyn Storage,
    user: &UserId,
    request: &ReorderCardsRequest,
) -> Result<()> {
    request.validate()?;

    let ids: Vec<CardId> = request.cards.iter().map(|u| u.id.clone()).collect();
    let cards = store.find_cards(&ids).await?;
    if let Some(missing) = ids.iter().find(|id| !cards.iter().any(|c| &c.id == *id)) {
        return Err(KanbanError::card_not_found(missing));
    }

    let mut boards_by_list: HashMap<ListId, BoardId> = HashMap::new();
    let mut allowed: HashSet<BoardId> = HashSet::new();
    for card in &cards {
        let board_id = match boards_by_list.get(&card.list_id) {
            Some(board_id) => board_id.clone(),
            None => {
                let list = store
                    .find_list(&card.list_id)
                    .await?
                    .ok_or_else(|| KanbanError::list_not_found(&card.list_id))?;
                boards_by_list.insert(card.list_id.clone(), list.board_id.clone());
                list.board_id
            }
        };
        if allowed.contains(&board_id) {
            continue;
        }
        if !access::can_access_board(store, user, &board_id).await? {
            log::warn!(
                "User {} rejected reordering card {} on board {}",
                user,
                card.id,
                board_id
            );
            return Err(KanbanError::Forbidden);
        }
        allowed.insert(board_id);
    }

    store.set_card_orders(&request.cards).await?;
    log::info!("Reordered {} cards for {}", request.cards.len(), user);
    Ok(())
}

/// Re-parents a card into `list_id`
///
/// Only the moved card is written. Callers fix up the destination siblings
/// with a follow-up [`reorder_cards`].
pub async fn move_card(
    store: &dyn Storage,
    user: &UserId,
    card_id: &CardId,
    request: &MoveCardRequest,
) -> Result<Card> {
    request.validate()?;
    access::require_card_access(store, user, card_id).await?;
    access::require_list_access(store, user, &request.list_id).await?;

    let order = match request.order {
        Some(order) => order,
        None => store.next_card_order(&request.list_id).await?,
    };

    let card = store.move_card(card_id, &request.list_id, order).await?;
    log::info!(
        "Moved card {} to list {} at {} for {}",
        card_id,
        request.list_id,
        order,
        user
    );
    Ok(card)
}

/// Rewrites the order of the images attached to one card
pub async fn reorder_images(
    store: &dyn Storage,
    user: &UserId,
    card_id: &CardId,
    request: &ReorderImagesRequest,
) -> Result<()> {
    request.validate()?;
    access::require_card_access(store, user, card_id).await?;

    for update in &request.image_orders {
        let attached = store
            .find_image(&update.id)
            .await?
            .is_some_and(|image| &image.card_id == card_id);
        if !attached {
            return Err(KanbanError::image_not_found(&update.id));
        }
    }

    store.set_image_orders(&request.image_orders).await?;
    log::info!(
        "Reordered {} images on card {} for {}",
        request.image_orders.len(),
        card_id,
        user
    );
    Ok(())
}

/// Images of a card in display order
pub async fn list_images(
    store: &dyn Storage,
    user: &UserId,
    card_id: &CardId,
) -> Result<Vec<CardImage>> {
    access::require_card_access(store, user, card_id).await?;
    store.images_by_card(card_id).await
}
