//! Behaviour every `Storage` backend must share, run from each backend's tests.

use crate::{
    domain::{
        Board, Card, CardId, CardImage, ImageId, List, ListId, MemberRole, Membership,
        OrderUpdate, Organization, UserId,
    },
    error::KanbanError,
    storage::Storage,
};

pub struct Fixture {
    pub org: Organization,
    pub board: Board,
    pub list: List,
    pub member: UserId,
}

impl Fixture {
    /// One organization with a member, one board, one empty list at order 1
    pub async fn seed(storage: &dyn Storage) -> Self {
        let org = Organization::new("Org");
        storage.create_organization(&org).await.unwrap();

        let member = UserId::from("member");
        storage
            .add_member(&Membership {
                organization_id: org.id.clone(),
                user_id: member.clone(),
                role: MemberRole::Member,
            })
            .await
            .unwrap();

        let board = Board::new(org.id.clone(), "Board");
        storage.create_board(&board).await.unwrap();

        let list = List::new(board.id.clone(), "Todo", 1);
        storage.insert_list(&list).await.unwrap();

        Self {
            org,
            board,
            list,
            member,
        }
    }

    /// Appends cards to the fixture list using the store's order assignment
    pub async fn add_cards(&self, storage: &dyn Storage, titles: &[&str]) -> Vec<Card> {
        let mut cards = Vec::new();
        for title in titles {
            let order = storage.next_card_order(&self.list.id).await.unwrap();
            let card = Card::new(self.list.id.clone(), *title, order);
            storage.insert_card(&card).await.unwrap();
            cards.push(card);
        }
        cards
    }

    /// Attaches images to a card, appended in the given order
    pub async fn add_images(
        &self,
        storage: &dyn Storage,
        card: &Card,
        urls: &[&str],
    ) -> Vec<CardImage> {
        let mut images = Vec::new();
        for url in urls {
            let order = storage.next_image_order(&card.id).await.unwrap();
            let image = CardImage::new(card.id.clone(), *url, order);
            storage.insert_image(&image).await.unwrap();
            images.push(image);
        }
        images
    }

    pub async fn add_list(&self, storage: &dyn Storage, title: &str) -> List {
        let order = storage.next_list_order(&self.board.id).await.unwrap();
        let list = List::new(self.board.id.clone(), title, order);
        storage.insert_list(&list).await.unwrap();
        list
    }
}

fn titles(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.title.as_str()).collect()
}

pub async fn run_all(storage: &dyn Storage) {
    sequential_creation_gets_increasing_orders(storage).await;
    children_are_sorted_ascending(storage).await;
    set_orders_applies_permutation_idempotently(storage).await;
    set_orders_is_all_or_nothing(storage).await;
    move_card_reparents(storage).await;
    delete_list_cascades(storage).await;
    membership_lookup(storage).await;
    last_writer_wins(storage).await;
    next_order_after_max_is_an_error(storage).await;
    images_are_ordered_per_card(storage).await;
}

async fn sequential_creation_gets_increasing_orders(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    let cards = fixture.add_cards(storage, &["A", "B", "C"]).await;

    let orders: Vec<i64> = cards.iter().map(|c| c.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let second = fixture.add_list(storage, "Doing").await;
    assert_eq!(second.order, 2);
}

async fn children_are_sorted_ascending(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    for (title, order) in [("late", 30), ("early", 2), ("middle", 10)] {
        storage
            .insert_card(&Card::new(fixture.list.id.clone(), title, order))
            .await
            .unwrap();
    }

    let cards = storage.cards_by_list(&fixture.list.id).await.unwrap();
    assert_eq!(titles(&cards), vec!["early", "middle", "late"]);
    assert_eq!(storage.next_card_order(&fixture.list.id).await.unwrap(), 31);

    let done = fixture.add_list(storage, "Done").await;
    storage
        .set_list_orders(&[OrderUpdate::new(done.id.clone(), 0)])
        .await
        .unwrap();
    let lists = storage.lists_by_board(&fixture.board.id).await.unwrap();
    let ids: Vec<&ListId> = lists.iter().map(|l| &l.id).collect();
    assert_eq!(ids, vec![&done.id, &fixture.list.id]);
}

async fn set_orders_applies_permutation_idempotently(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    let cards = fixture.add_cards(storage, &["C1", "C2", "C3"]).await;
    let updates = vec![
        OrderUpdate::new(cards[0].id.clone(), 1),
        OrderUpdate::new(cards[2].id.clone(), 2),
        OrderUpdate::new(cards[1].id.clone(), 3),
    ];

    storage.set_card_orders(&updates).await.unwrap();
    let once = storage.cards_by_list(&fixture.list.id).await.unwrap();
    assert_eq!(titles(&once), vec!["C1", "C3", "C2"]);

    storage.set_card_orders(&updates).await.unwrap();
    let twice = storage.cards_by_list(&fixture.list.id).await.unwrap();
    assert_eq!(titles(&twice), vec!["C1", "C3", "C2"]);
}

async fn set_orders_is_all_or_nothing(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    let cards = fixture.add_cards(storage, &["A", "B"]).await;

    let result = storage
        .set_card_orders(&[
            OrderUpdate::new(cards[1].id.clone(), 1),
            OrderUpdate::new(CardId::from("missing"), 5),
            OrderUpdate::new(cards[0].id.clone(), 2),
        ])
        .await;
    assert!(matches!(result, Err(KanbanError::NotFound(_))));

    let after = storage.cards_by_list(&fixture.list.id).await.unwrap();
    assert_eq!(titles(&after), vec!["A", "B"]);
    assert_eq!(after[0].order, 1);

    let result = storage
        .set_list_orders(&[
            OrderUpdate::new(fixture.list.id.clone(), 9),
            OrderUpdate::new(ListId::from("missing"), 1),
        ])
        .await;
    assert!(result.is_err());
    let list = storage.find_list(&fixture.list.id).await.unwrap().unwrap();
    assert_eq!(list.order, 1);
}

async fn move_card_reparents(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    let cards = fixture.add_cards(storage, &["C1", "C2"]).await;
    let target = fixture.add_list(storage, "Empty").await;

    let order = storage.next_card_order(&target.id).await.unwrap();
    assert_eq!(order, 1);

    let moved = storage
        .move_card(&cards[0].id, &target.id, order)
        .await
        .unwrap();
    assert_eq!(moved.list_id, target.id);
    assert_eq!(moved.order, 1);

    let source = storage.cards_by_list(&fixture.list.id).await.unwrap();
    assert_eq!(titles(&source), vec!["C2"]);
    let dest = storage.cards_by_list(&target.id).await.unwrap();
    assert_eq!(titles(&dest), vec!["C1"]);

    let missing = storage
        .move_card(&cards[1].id, &ListId::from("missing"), 1)
        .await;
    assert!(matches!(missing, Err(KanbanError::NotFound(_))));
    let still = storage.find_card(&cards[1].id).await.unwrap().unwrap();
    assert_eq!(still.list_id, fixture.list.id);
}

async fn delete_list_cascades(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    let cards = fixture.add_cards(storage, &["A", "B"]).await;

    storage.delete_list(&fixture.list.id).await.unwrap();

    assert!(storage.find_list(&fixture.list.id).await.unwrap().is_none());
    assert!(storage.find_card(&cards[0].id).await.unwrap().is_none());
    assert!(storage
        .find_cards(&[cards[0].id.clone(), cards[1].id.clone()])
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        storage.delete_list(&fixture.list.id).await,
        Err(KanbanError::NotFound(_))
    ));
}

async fn membership_lookup(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;

    assert!(storage
        .is_member(&fixture.org.id, &fixture.member)
        .await
        .unwrap());
    assert!(!storage
        .is_member(&fixture.org.id, &UserId::from("stranger"))
        .await
        .unwrap());
}

async fn last_writer_wins(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    let cards = fixture.add_cards(storage, &["A", "B"]).await;

    storage
        .set_card_orders(&[
            OrderUpdate::new(cards[1].id.clone(), 1),
            OrderUpdate::new(cards[0].id.clone(), 2),
        ])
        .await
        .unwrap();
    storage
        .set_card_orders(&[OrderUpdate::new(cards[1].id.clone(), 2)])
        .await
        .unwrap();

    // No version check: both writes land and the later one wins per row,
    // leaving a duplicate order that reads resolve by id.
    let a = storage.find_card(&cards[0].id).await.unwrap().unwrap();
    let b = storage.find_card(&cards[1].id).await.unwrap().unwrap();
    assert_eq!(a.order, 2);
    assert_eq!(b.order, 2);
}

async fn next_order_after_max_is_an_error(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    let cards = fixture.add_cards(storage, &["A"]).await;

    storage
        .set_card_orders(&[OrderUpdate::new(cards[0].id.clone(), i64::MAX)])
        .await
        .unwrap();
    storage
        .set_list_orders(&[OrderUpdate::new(fixture.list.id.clone(), i64::MAX)])
        .await
        .unwrap();

    assert!(matches!(
        storage.next_card_order(&fixture.list.id).await,
        Err(KanbanError::BadInput(_))
    ));
    assert!(matches!(
        storage.next_list_order(&fixture.board.id).await,
        Err(KanbanError::BadInput(_))
    ));
}

async fn images_are_ordered_per_card(storage: &dyn Storage) {
    let fixture = Fixture::seed(storage).await;
    let cards = fixture.add_cards(storage, &["A", "B"]).await;
    let images = fixture
        .add_images(storage, &cards[0], &["1.png", "2.png", "3.png"])
        .await;
    fixture.add_images(storage, &cards[1], &["other.png"]).await;

    let orders: Vec<i64> = images.iter().map(|i| i.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    storage
        .set_image_orders(&[
            OrderUpdate::new(images[2].id.clone(), 1),
            OrderUpdate::new(images[0].id.clone(), 2),
            OrderUpdate::new(images[1].id.clone(), 3),
        ])
        .await
        .unwrap();
    let urls: Vec<String> = storage
        .images_by_card(&cards[0].id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.url)
        .collect();
    assert_eq!(urls, vec!["3.png", "1.png", "2.png"]);

    let result = storage
        .set_image_orders(&[
            OrderUpdate::new(images[0].id.clone(), 9),
            OrderUpdate::new(ImageId::from("missing"), 1),
        ])
        .await;
    assert!(matches!(result, Err(KanbanError::NotFound(_))));
    let first = storage.find_image(&images[0].id).await.unwrap().unwrap();
    assert_eq!(first.order, 2);

    let orphan = CardImage::new(CardId::from("missing"), "x.png", 1);
    assert!(matches!(
        storage.insert_image(&orphan).await,
        Err(KanbanError::NotFound(_))
    ));

    storage.delete_card(&cards[0].id).await.unwrap();
    assert!(storage.images_by_card(&cards[0].id).await.unwrap().is_empty());
    assert!(storage.find_image(&images[0].id).await.unwrap().is_none());
    assert_eq!(storage.images_by_card(&cards[1].id).await.unwrap().len(), 1);
}
