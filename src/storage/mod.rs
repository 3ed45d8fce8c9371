use crate::{
    domain::{
        Board, BoardId, Card, CardId, CardImage, ImageId, List, ListId, Membership, OrderUpdate,
        Organization, OrganizationId, UserId,
    },
    error::Result,
};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;
#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;
mod tables;

#[cfg(test)]
pub(crate) mod conformance;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Storage trait for organizations, boards and their ordered lists, cards and images
///
/// Children are always returned sorted ascending by `order`. Batch order
/// updates are all-or-nothing: an unknown id fails the batch and no row is
/// written. Nothing here checks access; callers do that first.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Checks if the backend has been initialized
    async fn is_initialized(&self) -> bool;

    async fn create_organization(&self, org: &Organization) -> Result<()>;

    /// Adds a membership row, replacing the role of an existing one
    async fn add_member(&self, membership: &Membership) -> Result<()>;

    async fn is_member(&self, org: &OrganizationId, user: &UserId) -> Result<bool>;

    async fn create_board(&self, board: &Board) -> Result<()>;

    async fn find_board(&self, id: &BoardId) -> Result<Option<Board>>;

    /// Deletes a board with all of its lists and cards
    async fn delete_board(&self, id: &BoardId) -> Result<()>;

    async fn insert_list(&self, list: &List) -> Result<()>;

    async fn find_list(&self, id: &ListId) -> Result<Option<List>>;

    /// Lists of a board in display order
    async fn lists_by_board(&self, board: &BoardId) -> Result<Vec<List>>;

    /// Deletes a list with all of its cards and their images
    async fn delete_list(&self, id: &ListId) -> Result<()>;

    /// Applies every `(id, order)` pair atomically
    async fn set_list_orders(&self, updates: &[OrderUpdate<ListId>]) -> Result<()>;

    /// `max(order) + 1` over the board's lists, or `1` when it has none;
    /// `BadInput` when a list already sits at `i64::MAX`
    async fn next_list_order(&self, board: &BoardId) -> Result<i64>;

    async fn insert_card(&self, card: &Card) -> Result<()>;

    async fn find_card(&self, id: &CardId) -> Result<Option<Card>>;

    /// Looks up several cards; ids without a row are skipped
    async fn find_cards(&self, ids: &[CardId]) -> Result<Vec<Card>> {
        let mut cards = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(card) = self.find_card(id).await? {
                cards.push(card);
            }
        }
        Ok(cards)
    }

    /// Cards of a list in display order
    async fn cards_by_list(&self, list: &ListId) -> Result<Vec<Card>>;

    /// Deletes a card with its images
    async fn delete_card(&self, id: &CardId) -> Result<()>;

    /// Applies every `(id, order)` pair atomically
    async fn set_card_orders(&self, updates: &[OrderUpdate<CardId>]) -> Result<()>;

    /// Changes a card's list and order together and returns the updated card
    async fn move_card(&self, id: &CardId, list: &ListId, order: i64) -> Result<Card>;

    /// `max(order) + 1` over the list's cards, or `1` when it has none;
    /// `BadInput` when a card already sits at `i64::MAX`
    async fn next_card_order(&self, list: &ListId) -> Result<i64>;

    async fn insert_image(&self, image: &CardImage) -> Result<()>;

    async fn find_image(&self, id: &ImageId) -> Result<Option<CardImage>>;

    /// Images of a card in display order
    async fn images_by_card(&self, card: &CardId) -> Result<Vec<CardImage>>;

    /// Applies every `(id, order)` pair atomically
    async fn set_image_orders(&self, updates: &[OrderUpdate<ImageId>]) -> Result<()>;

    /// `max(order) + 1` over the card's images, or `1` when it has none
    async fn next_image_order(&self, card: &CardId) -> Result<i64>;
}
