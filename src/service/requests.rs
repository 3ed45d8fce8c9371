//! Typed request bodies. Every body is parsed and validated here, before any
//! store lookup happens.

use crate::{
    domain::{CardId, ImageId, ListId, OrderUpdate},
    error::{KanbanError, Result},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_TITLE_LEN: usize = 50;

/// Parses a JSON body, turning any shape mismatch into `BadInput`
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| KanbanError::BadInput(e.to_string()))
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(KanbanError::BadInput("title is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(KanbanError::BadInput(format!(
            "title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_batch<I>(updates: &[OrderUpdate<I>]) -> Result<()>
where
    I: AsRef<str> + Eq + std::hash::Hash,
{
    let mut seen = HashSet::with_capacity(updates.len());
    for update in updates {
        if update.id.as_ref().trim().is_empty() {
            return Err(KanbanError::BadInput("id is required".to_string()));
        }
        if !seen.insert(&update.id) {
            return Err(KanbanError::BadInput(format!(
                "duplicate id {}",
                update.id.as_ref()
            )));
        }
    }
    Ok(())
}

/// `{ "lists": [{ "id", "order" }] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderListsRequest {
    pub lists: Vec<OrderUpdate<ListId>>,
}

impl ReorderListsRequest {
    pub fn validate(&self) -> Result<()> {
        validate_batch(&self.lists)
    }
}

/// `{ "cards": [{ "id", "order" }] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderCardsRequest {
    pub cards: Vec<OrderUpdate<CardId>>,
}

impl ReorderCardsRequest {
    pub fn validate(&self) -> Result<()> {
        validate_batch(&self.cards)
    }
}

/// `{ "imageOrders": [{ "id", "order" }] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderImagesRequest {
    pub image_orders: Vec<OrderUpdate<ImageId>>,
}

impl ReorderImagesRequest {
    pub fn validate(&self) -> Result<()> {
        validate_batch(&self.image_orders)
    }
}

/// `{ "listId", "order"? }`; without an order the card goes to the end of the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardRequest {
    pub list_id: ListId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl MoveCardRequest {
    pub fn validate(&self) -> Result<()> {
        if self.list_id.as_str().trim().is_empty() {
            return Err(KanbanError::BadInput("listId is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
}

impl CreateListRequest {
    /// Returns the trimmed title
    pub fn validate(&self) -> Result<String> {
        validate_title(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateCardRequest {
    /// Returns the trimmed title
    pub fn validate(&self) -> Result<String> {
        validate_title(&self.title)
    }
}
