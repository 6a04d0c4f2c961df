//! Virtualized list windowing
//!
//! Only items intersecting the viewport (plus an overscan margin) are
//! rendered, so render cost does not grow with the length of the list.

mod follow;
mod layout;

pub use follow::{FollowBottom, DEFAULT_FOLLOW_THRESHOLD_PX};
pub use layout::{VirtualItem, VirtualListLayout, VisibleRange};
