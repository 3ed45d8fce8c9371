//! Sends the calls of a drop to the server.
//!
//! Calls run in order and a failed call does not stop the ones after it.
//! Failures are logged; whether the optimistic local state is kept or rolled
//! back is decided by [`FailurePolicy`].

use crate::{
    client::drag::{BoardView, DropOutcome, PersistCall},
    domain::{BoardId, Card, CardId, ListId, OrderUpdate, UserId},
    error::{KanbanError, Result},
    service::{self, MoveCardRequest, ReorderCardsRequest, ReorderListsRequest},
    storage::Storage,
};
use async_trait::async_trait;
use std::sync::Arc;

/// The three reorder endpoints, however they are reached
#[async_trait]
pub trait ReorderApi: Send + Sync {
    async fn reorder_lists(&self, board: &BoardId, lists: &[OrderUpdate<ListId>]) -> Result<()>;

    async fn reorder_cards(&self, cards: &[OrderUpdate<CardId>]) -> Result<()>;

    /// Moves without an explicit order, so the server appends
    async fn move_card(&self, card: &CardId, list: &ListId) -> Result<Card>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Leave the local move in place and only log
    #[default]
    KeepOptimistic,
    /// Restore the pre-drag lists when any call fails
    Revert,
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub attempted: usize,
    pub failures: Vec<(PersistCall, KanbanError)>,
    pub reverted: bool,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

async fn send(api: &dyn ReorderApi, call: &PersistCall) -> Result<()> {
    match call {
        PersistCall::MoveCard { card, list } => api.move_card(card, list).await.map(|_| ()),
        PersistCall::ReorderCards(cards) => api.reorder_cards(cards).await,
        PersistCall::ReorderLists { board, lists } => api.reorder_lists(board, lists).await,
    }
}

/// Issues every call of `outcome` in sequence
pub async fn dispatch(
    api: &dyn ReorderApi,
    view: &mut BoardView,
    outcome: DropOutcome,
    policy: FailurePolicy,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for call in outcome.calls {
        report.attempted += 1;
        if let Err(e) = send(api, &call).await {
            log::error!("Failed to persist {:?}: {}", call, e);
            report.failures.push((call, e));
        }
    }

    if !report.is_success() && policy == FailurePolicy::Revert {
        log::warn!(
            "Reverting board {} after {} failed call(s)",
            view.board_id(),
            report.failures.len()
        );
        view.revert(outcome.previous);
        report.reverted = true;
    }
    report
}

/// Runs the calls in-process against a store, as a given user
pub struct ServiceReorderApi {
    storage: Arc<dyn Storage>,
    user: UserId,
}

impl ServiceReorderApi {
    pub fn new(storage: Arc<dyn Storage>, user: UserId) -> Self {
        Self { storage, user }
    }
}

#[async_trait]
impl ReorderApi for ServiceReorderApi {
    async fn reorder_lists(&self, board: &BoardId, lists: &[OrderUpdate<ListId>]) -> Result<()> {
        let request = ReorderListsRequest {
            lists: lists.to_vec(),
        };
        service::reorder_lists(self.storage.as_ref(), &self.user, board, &request).await
    }

    async fn reorder_cards(&self, cards: &[OrderUpdate<CardId>]) -> Result<()> {
        let request = ReorderCardsRequest {
            cards: cards.to_vec(),
        };
        service::reorder_cards(self.storage.as_ref(), &self.user, &request).await
    }

    async fn move_card(&self, card: &CardId, list: &ListId) -> Result<Card> {
        let request = MoveCardRequest {
            list_id: list.clone(),
            order: None,
        };
        service::move_card(self.storage.as_ref(), &self.user, card, &request).await
    }
}
