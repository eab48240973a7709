use std::collections::HashMap;
use serde::Serialize;
use crate::errors::YouTubeError;
use crate::models::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    /// No fetch in flight and nothing loaded yet (or no query at all).
    Idle,
    FetchingFirstPage,
    /// At least one page loaded and a continuation token is available.
    Ready,
    FetchingNextPage,
    /// The last page came back without a continuation token.
    Exhausted,
}

impl FeedStatus {
    pub fn is_fetching(self) -> bool {
        matches!(self, FeedStatus::FetchingFirstPage | FeedStatus::FetchingNextPage)
    }
}

/// Last fetch failure, kept so a failed query is distinguishable from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl From<&YouTubeError> for FeedError {
    fn from(err: &YouTubeError) -> Self {
        FeedError {
            code: err.code().to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Accumulated pages of one query key.
#[derive(Debug, Clone)]
pub struct Session {
    pub pages: Vec<Page>,
    pub next_page_token: Option<String>,
    pub status: FeedStatus,
    pub error: Option<FeedError>,
}

impl Session {
    fn new() -> Self {
        Session {
            pages: Vec::new(),
            next_page_token: None,
            status: FeedStatus::Idle,
            error: None,
        }
    }

    /// Status to fall back to when a fetch fails.
    pub fn settled_status(&self) -> FeedStatus {
        if self.pages.is_empty() {
            FeedStatus::Idle
        } else if self.next_page_token.is_some() {
            FeedStatus::Ready
        } else {
            FeedStatus::Exhausted
        }
    }
}

/// Page sequences keyed by query string.
///
/// Only the active key is retained: activating a key evicts every other
/// entry and bumps the generation, so results computed for an earlier
/// generation can be recognized and dropped.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, Session>,
    generation: u64,
}

impl QueryCache {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a fresh session for `key`, discarding everything cached so far.
    pub fn activate(&mut self, key: &str) -> u64 {
        self.entries.clear();
        self.entries.insert(key.to_string(), Session::new());
        self.generation += 1;
        self.generation
    }

    pub fn clear(&mut self) -> u64 {
        self.entries.clear();
        self.generation += 1;
        self.generation
    }

    pub fn get(&self, key: &str) -> Option<&Session> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Session> {
        self.entries.get_mut(key)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
