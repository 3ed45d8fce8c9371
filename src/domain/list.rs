use crate::domain::{
    card::Card,
    ids::{BoardId, ListId},
    ordering::Ordered,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A list (column) on a board; `order` is its position among sibling lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub board_id: BoardId,
    pub title: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    /// Creates a list at the given position
    pub fn new(board_id: BoardId, title: impl Into<String>, order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: ListId::generate(),
            board_id,
            title: title.into(),
            order,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_order(&mut self, order: i64) {
        self.order = order;
        self.updated_at = Utc::now();
    }
}

impl Ordered for List {
    type Id = ListId;

    fn id(&self) -> &ListId {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// A list with its cards in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWithCards {
    #[serde(flatten)]
    pub list: List,
    pub cards: Vec<Card>,
}

impl ListWithCards {
    pub fn new(list: List, cards: Vec<Card>) -> Self {
        Self { list, cards }
    }

    pub fn id(&self) -> &ListId {
        &self.list.id
    }

    pub fn contains_card(&self, card_id: &crate::domain::CardId) -> bool {
        self.cards.iter().any(|c| &c.id == card_id)
    }

    pub fn card_index(&self, card_id: &crate::domain::CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == card_id)
    }
}

impl Ordered for ListWithCards {
    type Id = ListId;

    fn id(&self) -> &ListId {
        &self.list.id
    }

    fn order(&self) -> i64 {
        self.list.order
    }
}
