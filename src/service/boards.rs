//! Board reads plus list/card creation and deletion.

use crate::{
    domain::{BoardId, BoardWithLists, Card, CardId, List, ListId, ListWithCards, UserId},
    error::{KanbanError, Result},
    service::{
        access,
        requests::{CreateCardRequest, CreateListRequest},
    },
    storage::Storage,
};

/// Loads a board with its lists and cards in display order
pub async fn get_board(store: &dyn Storage, user: &UserId, board_id: &BoardId) -> Result<BoardWithLists> {
    let board = access::require_board(store, user, board_id).await?;

    let mut lists = Vec::new();
    for list in store.lists_by_board(board_id).await? {
        let cards = store.cards_by_list(&list.id).await?;
        lists.push(ListWithCards::new(list, cards));
    }

    Ok(BoardWithLists { board, lists })
}

/// Appends a new list at the end of the board
pub async fn create_list(
    store: &dyn Storage,
    user: &UserId,
    board_id: &BoardId,
    request: &CreateListRequest,
) -> Result<List> {
    let title = request.validate()?;
    access::require_board(store, user, board_id).await?;

    let order = store.next_list_order(board_id).await?;
    let list = List::new(board_id.clone(), title, order);
    store.insert_list(&list).await?;

    log::info!("Created list {} on board {} at {}", list.id, board_id, order);
    Ok(list)
}

/// Deletes a list and its cards; the list must sit on `board_id`
pub async fn delete_list(
    store: &dyn Storage,
    user: &UserId,
    board_id: &BoardId,
    list_id: &ListId,
) -> Result<()> {
    access::require_board(store, user, board_id).await?;

    let on_board = store
        .find_list(list_id)
        .await?
        .is_some_and(|list| &list.board_id == board_id);
    if !on_board {
        return Err(KanbanError::list_not_found(list_id));
    }

    store.delete_list(list_id).await?;
    log::info!("Deleted list {} from board {}", list_id, board_id);
    Ok(())
}

/// Appends a new card at the end of the list
pub async fn create_card(
    store: &dyn Storage,
    user: &UserId,
    list_id: &ListId,
    request: &CreateCardRequest,
) -> Result<Card> {
    let title = request.validate()?;
    access::require_list_access(store, user, list_id).await?;

    let order = store.next_card_order(list_id).await?;
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    let card = Card::new(list_id.clone(), title, order).with_description(description);
    store.insert_card(&card).await?;

    log::info!("Created card {} in list {} at {}", card.id, list_id, order);
    Ok(card)
}

pub async fn delete_card(store: &dyn Storage, user: &UserId, card_id: &CardId) -> Result<()> {
    access::require_card_access(store, user, card_id).await?;
    store.delete_card(card_id).await?;
    log::info!("Deleted card {}", card_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Board, OrderUpdate};
    use crate::storage::{conformance::Fixture, MemoryStorage};

    fn list_request(title: &str) -> CreateListRequest {
        CreateListRequest {
            title: title.to_string(),
        }
    }

    fn card_request(title: &str) -> CreateCardRequest {
        CreateCardRequest {
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_list_appends() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;

        let doing = create_list(&store, &fixture.member, &fixture.board.id, &list_request(" Doing "))
            .await
            .unwrap();
        let done = create_list(&store, &fixture.member, &fixture.board.id, &list_request("Done"))
            .await
            .unwrap();

        assert_eq!(doing.title, "Doing");
        assert_eq!(doing.order, 2);
        assert_eq!(done.order, 3);
    }

    #[tokio::test]
    async fn test_sequential_cards_get_one_to_n() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;

        let mut orders = Vec::new();
        for title in ["A", "B", "C", "D"] {
            let card = create_card(&store, &fixture.member, &fixture.list.id, &card_request(title))
                .await
                .unwrap();
            orders.push(card.order);
        }

        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_create_card_after_gap_uses_max_plus_one() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;
        store
            .insert_card(&Card::new(fixture.list.id.clone(), "Old", 7))
            .await
            .unwrap();

        let request = CreateCardRequest {
            title: "New".to_string(),
            description: Some("  details ".to_string()),
        };
        let card = create_card(&store, &fixture.member, &fixture.list.id, &request)
            .await
            .unwrap();

        assert_eq!(card.order, 8);
        assert_eq!(card.description.as_deref(), Some("details"));
    }

    #[tokio::test]
    async fn test_create_after_max_order_is_bad_input() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;
        let cards = fixture.add_cards(&store, &["A"]).await;
        crate::service::reorder_cards(
            &store,
            &fixture.member,
            &crate::service::ReorderCardsRequest {
                cards: vec![OrderUpdate::new(cards[0].id.clone(), i64::MAX)],
            },
        )
        .await
        .unwrap();

        let result =
            create_card(&store, &fixture.member, &fixture.list.id, &card_request("B")).await;
        assert!(matches!(result, Err(KanbanError::BadInput(_))));
        assert_eq!(store.cards_by_list(&fixture.list.id).await.unwrap().len(), 1);

        store
            .set_list_orders(&[OrderUpdate::new(fixture.list.id.clone(), i64::MAX)])
            .await
            .unwrap();
        let result =
            create_list(&store, &fixture.member, &fixture.board.id, &list_request("Later")).await;
        assert!(matches!(result, Err(KanbanError::BadInput(_))));
        assert_eq!(store.lists_by_board(&fixture.board.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creations_may_share_an_order() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;

        // Both writers read max+1 before either inserts.
        let first = store.next_card_order(&fixture.list.id).await.unwrap();
        let second = store.next_card_order(&fixture.list.id).await.unwrap();
        store
            .insert_card(&Card::new(fixture.list.id.clone(), "A", first))
            .await
            .unwrap();
        store
            .insert_card(&Card::new(fixture.list.id.clone(), "B", second))
            .await
            .unwrap();

        let cards = store.cards_by_list(&fixture.list.id).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].order, cards[1].order);
        assert!(cards[0].id < cards[1].id);
    }

    #[tokio::test]
    async fn test_get_board_returns_sorted_tree() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;
        let done = fixture.add_list(&store, "Done").await;
        for (title, order) in [("second", 5), ("first", 2)] {
            store
                .insert_card(&Card::new(fixture.list.id.clone(), title, order))
                .await
                .unwrap();
        }

        let board = get_board(&store, &fixture.member, &fixture.board.id)
            .await
            .unwrap();

        assert_eq!(board.board.id, fixture.board.id);
        assert_eq!(board.lists.len(), 2);
        assert_eq!(board.lists[0].id(), &fixture.list.id);
        assert_eq!(board.lists[1].id(), &done.id);
        let titles: Vec<&str> = board.lists[0].cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);

        assert!(matches!(
            get_board(&store, &UserId::from("stranger"), &fixture.board.id).await,
            Err(KanbanError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_creation_requires_membership() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;
        let stranger = UserId::from("stranger");

        assert!(matches!(
            create_list(&store, &stranger, &fixture.board.id, &list_request("X")).await,
            Err(KanbanError::NotFound(_))
        ));
        assert!(matches!(
            create_card(&store, &stranger, &fixture.list.id, &card_request("X")).await,
            Err(KanbanError::Forbidden)
        ));
        assert!(matches!(
            create_card(&store, &fixture.member, &fixture.list.id, &card_request("")).await,
            Err(KanbanError::BadInput(_))
        ));
        assert!(store.cards_by_list(&fixture.list.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_list_checks_board() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;
        let cards = fixture.add_cards(&store, &["A"]).await;
        let other = Board::new(fixture.org.id.clone(), "Other");
        store.create_board(&other).await.unwrap();

        let wrong_board = delete_list(&store, &fixture.member, &other.id, &fixture.list.id).await;
        assert!(matches!(wrong_board, Err(KanbanError::NotFound(_))));
        assert!(store.find_list(&fixture.list.id).await.unwrap().is_some());

        delete_list(&store, &fixture.member, &fixture.board.id, &fixture.list.id)
            .await
            .unwrap();
        assert!(store.find_list(&fixture.list.id).await.unwrap().is_none());
        assert!(store.find_card(&cards[0].id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_card() {
        let store = MemoryStorage::new();
        let fixture = Fixture::seed(&store).await;
        let cards = fixture.add_cards(&store, &["A", "B"]).await;

        assert!(matches!(
            delete_card(&store, &UserId::from("stranger"), &cards[0].id).await,
            Err(KanbanError::Forbidden)
        ));

        delete_card(&store, &fixture.member, &cards[0].id).await.unwrap();
        let remaining = store.cards_by_list(&fixture.list.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].order, 2);
    }
}
