//! Search results feed: one query's pages of enriched result rows.

pub mod cache;
pub mod coordinator;
pub mod enrich;
pub mod normalize;
pub mod page;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{FeedError, FeedStatus};
pub use coordinator::{drive, Feed, FetchOutcome};
pub use page::fetch_page;
pub use view::{FeedView, ScrollTrigger};
