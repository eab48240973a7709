use std::sync::Arc;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use crate::errors::YouTubeError;
use crate::models::Page;
use crate::youtube::VideoPlatform;
use super::cache::{FeedError, FeedStatus, QueryCache};
use super::page::fetch_page;
use super::view::{FeedView, ScrollTrigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was appended; `exhausted` is set when it was the last one.
    Appended { page_index: usize, exhausted: bool },
    /// Another fetch for this query is still in flight.
    Suppressed,
    /// The query has no more pages.
    Exhausted,
    /// There is no query to fetch for.
    NoQuery,
    /// The query changed while the page was in flight; the page was dropped.
    Discarded,
}

#[derive(Debug, Default)]
struct FeedState {
    query: Option<String>,
    cache: QueryCache,
}

struct FetchTicket {
    query: String,
    generation: u64,
    page_token: Option<String>,
}

/// Infinite-scroll pagination over one search query at a time.
///
/// At most one page fetch is in flight; requests made meanwhile are
/// suppressed. Changing the query restarts from the first page and any page
/// still in flight for the old query is dropped when it arrives.
#[derive(Clone)]
pub struct Feed {
    platform: Arc<dyn VideoPlatform>,
    state: Arc<Mutex<FeedState>>,
    trigger: ScrollTrigger,
}

impl Feed {
    pub fn new(platform: Arc<dyn VideoPlatform>, trigger: ScrollTrigger) -> Self {
        Self {
            platform,
            state: Arc::new(Mutex::new(FeedState::default())),
            trigger,
        }
    }

    /// Switches to `query`, returning whether the key changed.
    ///
    /// Blank strings count as no query.
    pub fn set_query(&self, query: Option<String>) -> bool {
        let query = query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let mut state = self.state.lock();
        if state.query == query {
            return false;
        }

        let generation = match &query {
            Some(key) => state.cache.activate(key),
            None => state.cache.clear(),
        };
        tracing::info!(query = query.as_deref(), generation, "search query changed");
        state.query = query;
        true
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> FeedStatus {
        let state = self.state.lock();
        state.query
            .as_deref()
            .and_then(|key| state.cache.get(key))
            .map(|session| session.status)
            .unwrap_or(FeedStatus::Idle)
    }

    /// Whether another page can still be requested.
    pub fn has_more(&self) -> bool {
        let state = self.state.lock();
        match state.query.as_deref().and_then(|key| state.cache.get(key)) {
            Some(session) => session.pages.is_empty() || session.next_page_token.is_some(),
            None => false,
        }
    }

    /// Fetches the first page, or the next one if pages are already loaded.
    ///
    /// Dropping the returned future before it completes abandons the fetch
    /// and leaves the feed ready for a retry.
    pub async fn fetch_next(&self) -> Result<FetchOutcome, YouTubeError> {
        match self.begin_fetch() {
            Ok(ticket) => self.complete_fetch(ticket).await,
            Err(outcome) => Ok(outcome),
        }
    }

    /// Switches to `query` and loads its first page.
    #[cfg(test)]
    pub(crate) async fn load(&self, query: Option<String>) -> Result<FetchOutcome, YouTubeError> {
        self.set_query(query);
        self.fetch_next().await
    }

    /// Like `fetch_next`, but the page is fetched on its own task.
    ///
    /// The feed enters its fetching state before this returns. `None` means
    /// no fetch was started, for the same reasons `fetch_next` would skip it.
    pub fn spawn_fetch(&self) -> Option<JoinHandle<Result<FetchOutcome, YouTubeError>>> {
        let ticket = match self.begin_fetch() {
            Ok(ticket) => ticket,
            Err(outcome) => {
                tracing::trace!(?outcome, "no fetch started");
                return None;
            }
        };

        let feed = self.clone();
        Some(tokio::spawn(async move { feed.complete_fetch(ticket).await }))
    }

    /// Whether a list scrolled to `last_visible_row` should ask for more.
    pub fn wants_more(&self, last_visible_row: usize) -> bool {
        let view = self.view();
        view.has_more
            && !view.status.is_fetching()
            && self.trigger.is_near_end(view.total_rows(), last_visible_row)
    }

    pub fn view(&self) -> FeedView {
        let state = self.state.lock();
        let session = state.query.as_deref().and_then(|key| state.cache.get(key));

        let status = session.map(|s| s.status).unwrap_or(FeedStatus::Idle);
        let pages: Vec<Page> = session.map(|s| s.pages.clone()).unwrap_or_default();
        let has_more = session
            .map(|s| s.pages.is_empty() || s.next_page_token.is_some())
            .unwrap_or(false);
        let error: Option<FeedError> = session.and_then(|s| s.error.clone());

        FeedView {
            query: state.query.clone(),
            status,
            pages,
            is_loading_initial: status == FeedStatus::FetchingFirstPage,
            is_loading_more: status == FeedStatus::FetchingNextPage,
            has_more,
            error,
            placeholder_rows: if status.is_fetching() { self.trigger.placeholder_rows } else { 0 },
        }
    }

    fn begin_fetch(&self) -> Result<FetchTicket, FetchOutcome> {
        let mut state = self.state.lock();
        let generation = state.cache.generation();

        let query = match state.query.clone() {
            Some(query) => query,
            None => return Err(FetchOutcome::NoQuery),
        };
        let session = state.cache.get_mut(&query).ok_or(FetchOutcome::NoQuery)?;

        if session.status.is_fetching() {
            tracing::debug!(query = %query, "fetch already in flight");
            return Err(FetchOutcome::Suppressed);
        }

        let page_token = if session.pages.is_empty() {
            session.status = FeedStatus::FetchingFirstPage;
            None
        } else {
            match session.next_page_token.clone() {
                Some(token) => {
                    session.status = FeedStatus::FetchingNextPage;
                    Some(token)
                }
                None => return Err(FetchOutcome::Exhausted),
            }
        };

        Ok(FetchTicket {
            query,
            generation,
            page_token,
        })
    }

    async fn complete_fetch(&self, ticket: FetchTicket) -> Result<FetchOutcome, YouTubeError> {
        let mut in_flight = InFlight::new(self.state.clone(), &ticket);
        let result = fetch_page(
            self.platform.as_ref(),
            &ticket.query,
            ticket.page_token.as_deref(),
        )
        .await;
        in_flight.disarm();

        self.finish_fetch(ticket, result)
    }

    fn finish_fetch(
        &self,
        ticket: FetchTicket,
        result: Result<Page, YouTubeError>,
    ) -> Result<FetchOutcome, YouTubeError> {
        let mut state = self.state.lock();

        if state.cache.generation() != ticket.generation {
            tracing::debug!(query = %ticket.query, "dropping page of a previous query");
            return Ok(FetchOutcome::Discarded);
        }
        let Some(session) = state.cache.get_mut(&ticket.query) else {
            return Ok(FetchOutcome::Discarded);
        };

        match result {
            Ok(page) => {
                let exhausted = page.next_page_token.is_none();
                session.next_page_token = page.next_page_token.clone();
                session.pages.push(page);
                session.status = if exhausted { FeedStatus::Exhausted } else { FeedStatus::Ready };
                session.error = None;

                let page_index = session.pages.len() - 1;
                tracing::info!(query = %ticket.query, page_index, exhausted, "page appended");
                Ok(FetchOutcome::Appended { page_index, exhausted })
            }
            Err(err) => {
                session.status = session.settled_status();
                session.error = Some(FeedError::from(&err));
                tracing::warn!(query = %ticket.query, error = %err, "page fetch failed");
                Err(err)
            }
        }
    }
}

/// Reverts the fetching status if a fetch is dropped before it completes.
struct InFlight {
    state: Arc<Mutex<FeedState>>,
    query: String,
    generation: u64,
    armed: bool,
}

impl InFlight {
    fn new(state: Arc<Mutex<FeedState>>, ticket: &FetchTicket) -> Self {
        InFlight {
            state,
            query: ticket.query.clone(),
            generation: ticket.generation,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut state = self.state.lock();
        if state.cache.generation() != self.generation {
            return;
        }
        if let Some(session) = state.cache.get_mut(&self.query) {
            if session.status.is_fetching() {
                session.status = session.settled_status();
                tracing::debug!(query = %self.query, "page fetch abandoned");
            }
        }
    }
}

/// Keeps `feed` in step with a query source and a "request more" trigger.
///
/// Every change of the query starts loading its first page; every request
/// for more starts the next fetch. Fetches run on their own tasks so a query
/// change is never blocked behind a slow page. Returns when either channel
/// closes.
pub async fn drive(
    feed: Feed,
    mut queries: watch::Receiver<Option<String>>,
    more: async_channel::Receiver<()>,
) {
    let initial = queries.borrow_and_update().clone();
    if feed.set_query(initial) {
        feed.spawn_fetch();
    }

    loop {
        tokio::select! {
            changed = queries.changed() => {
                if changed.is_err() {
                    break;
                }
                let query = queries.borrow_and_update().clone();
                if feed.set_query(query) {
                    feed.spawn_fetch();
                }
            }
            request = more.recv() => {
                if request.is_err() {
                    break;
                }
                feed.spawn_fetch();
            }
        }
    }

    tracing::debug!("feed driver stopped");
}
