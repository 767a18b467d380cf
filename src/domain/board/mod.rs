//! Board module - the personalized public feed.
//!
//! Pure functions: callers load the published items and the viewer's
//! preferences, then filter and rank here.

mod ranking;
mod search;

pub use ranking::{rank, BoardItem, FeedWindow};
pub use search::{AnnouncementSearchParams, EventSearchParams};
