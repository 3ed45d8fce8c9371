use crate::domain::{
    ids::{CardId, ListId},
    ordering::Ordered,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card; belongs to exactly one list at a time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates a card at the given position inside a list
    pub fn new(list_id: ListId, title: impl Into<String>, order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::generate(),
            list_id,
            title: title.into(),
            description: None,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn set_order(&mut self, order: i64) {
        self.order = order;
        self.updated_at = Utc::now();
    }

    /// Re-parents the card; `list_id` and `order` always change together
    pub fn move_to(&mut self, list_id: ListId, order: i64) {
        self.list_id = list_id;
        self.order = order;
        self.updated_at = Utc::now();
    }
}

impl Ordered for Card {
    type Id = CardId;

    fn id(&self) -> &CardId {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }
}
