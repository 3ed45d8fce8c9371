pub mod board;
pub mod card;
pub mod ids;
pub mod image;
pub mod list;
pub mod ordering;

pub use board::{Board, BoardWithLists, MemberRole, Membership, Organization};
pub use card::Card;
pub use ids::{BoardId, CardId, ImageId, ListId, OrganizationId, UserId};
pub use image::CardImage;
pub use list::{List, ListWithCards};
pub use ordering::{array_move, next_order, renumber, sort_by_order, OrderUpdate, Ordered};
