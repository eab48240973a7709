use serde::Serialize;
use crate::models::Page;
use super::cache::{FeedError, FeedStatus};

pub const DEFAULT_SCROLL_THRESHOLD_ROWS: usize = 10;
pub const DEFAULT_PLACEHOLDER_ROWS: usize = 12;

/// How the result list asks for more rows and what it shows while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTrigger {
    /// Request more once the last visible row is this close to the end.
    pub threshold_rows: usize,
    /// Skeleton rows to show while any fetch is pending.
    pub placeholder_rows: usize,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        ScrollTrigger {
            threshold_rows: DEFAULT_SCROLL_THRESHOLD_ROWS,
            placeholder_rows: DEFAULT_PLACEHOLDER_ROWS,
        }
    }
}

impl ScrollTrigger {
    pub fn is_near_end(&self, total_rows: usize, last_visible_row: usize) -> bool {
        let remaining = total_rows.saturating_sub(last_visible_row.saturating_add(1));
        remaining <= self.threshold_rows
    }
}

/// Everything the result list needs to render one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FeedView {
    pub query: Option<String>,
    pub status: FeedStatus,
    pub pages: Vec<Page>,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub has_more: bool,
    pub error: Option<FeedError>,
    pub placeholder_rows: usize,
}

impl FeedView {
    pub fn total_rows(&self) -> usize {
        self.pages.iter().map(|page| page.results.len()).sum()
    }
}
