//! # Kanban Core
//!
//! Boards, lists and cards with an ordered reorder/move protocol.
//!
//! Lists, cards and card images carry an integer `order` among their
//! siblings. New items go to the end (`max + 1`), drags rewrite the order of
//! a whole collection in one atomic batch, and moving a card between lists
//! changes its list and order together. Every mutation is gated on
//! organization membership.
//!
//! The crate holds the storage backends, the access-checked operations, an
//! axum HTTP surface over them and the client-side drag state machine that
//! produces the calls.

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use domain::{
    Board, BoardId, BoardWithLists, Card, CardId, CardImage, ImageId, List, ListId,
    ListWithCards, OrderUpdate, Organization, OrganizationId, UserId,
};
pub use error::{KanbanError, Result};
pub use state::AppState;
pub use storage::Storage;
