//! Client side of the reorder protocol: local drag state and the calls that
//! persist a drop.

pub mod drag;
pub mod http;
pub mod persist;

pub use drag::{BoardView, DragItem, DragState, DropKind, DropOutcome, DropTarget, Hover, PersistCall};
pub use http::HttpReorderApi;
pub use persist::{dispatch, DispatchReport, FailurePolicy, ReorderApi, ServiceReorderApi};
