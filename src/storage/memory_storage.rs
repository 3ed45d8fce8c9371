use crate::{
    domain::{
        Board, BoardId, Card, CardId, CardImage, ImageId, List, ListId, Membership, OrderUpdate,
        Organization, OrganizationId, UserId,
    },
    error::Result,
    storage::{tables::Tables, Storage},
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory storage; every write runs under one write guard
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        true
    }

    async fn create_organization(&self, org: &Organization) -> Result<()> {
        self.tables.write().await.create_organization(org)
    }

    async fn add_member(&self, membership: &Membership) -> Result<()> {
        self.tables.write().await.add_member(membership)
    }

    async fn is_member(&self, org: &OrganizationId, user: &UserId) -> Result<bool> {
        Ok(self.tables.read().await.is_member(org, user))
    }

    async fn create_board(&self, board: &Board) -> Result<()> {
        self.tables.write().await.create_board(board)
    }

    async fn find_board(&self, id: &BoardId) -> Result<Option<Board>> {
        Ok(self.tables.read().await.find_board(id))
    }

    async fn delete_board(&self, id: &BoardId) -> Result<()> {
        self.tables.write().await.delete_board(id)
    }

    async fn insert_list(&self, list: &List) -> Result<()> {
        self.tables.write().await.insert_list(list)
    }

    async fn find_list(&self, id: &ListId) -> Result<Option<List>> {
        Ok(self.tables.read().await.find_list(id))
    }

    async fn lists_by_board(&self, board: &BoardId) -> Result<Vec<List>> {
        Ok(self.tables.read().await.lists_by_board(board))
    }

    async fn delete_list(&self, id: &ListId) -> Result<()> {
        self.tables.write().await.delete_list(id)
    }

    async fn set_list_orders(&self, updates: &[OrderUpdate<ListId>]) -> Result<()> {
        self.tables.write().await.set_list_orders(updates)
    }

    async fn next_list_order(&self, board: &BoardId) -> Result<i64> {
        self.tables.read().await.next_list_order(board)
    }

    async fn insert_card(&self, card: &Card) -> Result<()> {
        self.tables.write().await.insert_card(card)
    }

    async fn find_card(&self, id: &CardId) -> Result<Option<Card>> {
        Ok(self.tables.read().await.find_card(id))
    }

    async fn cards_by_list(&self, list: &ListId) -> Result<Vec<Card>> {
        Ok(self.tables.read().await.cards_by_list(list))
    }

    async fn delete_card(&self, id: &CardId) -> Result<()> {
        self.tables.write().await.delete_card(id)
    }

    async fn set_card_orders(&self, updates: &[OrderUpdate<CardId>]) -> Result<()> {
        self.tables.write().await.set_card_orders(updates)
    }

    async fn move_card(&self, id: &CardId, list: &ListId, order: i64) -> Result<Card> {
        self.tables.write().await.move_card(id, list, order)
    }

    async fn next_card_order(&self, list: &ListId) -> Result<i64> {
        self.tables.read().await.next_card_order(list)
    }

    async fn insert_image(&self, image: &CardImage) -> Result<()> {
        self.tables.write().await.insert_image(image)
    }

    async fn find_image(&self, id: &ImageId) -> Result<Option<CardImage>> {
        Ok(self.tables.read().await.find_image(id))
    }

    async fn images_by_card(&self, card: &CardId) -> Result<Vec<CardImage>> {
        Ok(self.tables.read().await.images_by_card(card))
    }

    async fn set_image_orders(&self, updates: &[OrderUpdate<ImageId>]) -> Result<()> {
        self.tables.write().await.set_image_orders(updates)
    }

    async fn next_image_order(&self, card: &CardId) -> Result<i64> {
        self.tables.read().await.next_image_order(card)
    }
}
