use crate::domain::{
    ids::{CardId, ImageId},
    ordering::Ordered,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An image attached to a card; only the metadata and its position live here,
/// the file itself sits in an external file store behind `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardImage {
    pub id: ImageId,
    pub card_id: CardId,
    pub url: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardImage {
    pub fn new(card_id: CardId, url: impl Into<String>, order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: ImageId::generate(),
            card_id,
            url: url.into(),
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

impl Ordered for CardImage {
    type Id = ImageId;

    fn id(&self) -> &ImageId {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }
}
