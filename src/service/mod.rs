//! Access-checked operations shared by the HTTP handlers and in-process callers.
//!
//! Every function takes the already-resolved session user; mapping a missing
//! session to `Unauthorized` happens at the edge via [`access::require_user`].

pub mod access;
pub mod boards;
pub mod reorder;
pub mod requests;

pub use access::{can_access_board, require_user};
pub use boards::{create_card, create_list, delete_card, delete_list, get_board};
pub use reorder::{list_images, move_card, reorder_cards, reorder_images, reorder_lists};
pub use requests::{
    parse_body, CreateCardRequest, CreateListRequest, MoveCardRequest, ReorderCardsRequest,
    ReorderImagesRequest, ReorderListsRequest,
};
