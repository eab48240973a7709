use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use parking_lot::{Mutex, RwLock};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use crate::feed::{drive, Feed, FeedView, ScrollTrigger};
use crate::youtube::VideoPlatform;

const FEED_ID_LEN: usize = 16;
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(10);

pub struct AppState {
    pub platform: Arc<dyn VideoPlatform>,
    pub scroll: ScrollTrigger,
    /// Feeds not accessed for this long are closed by the sweeper.
    pub feed_ttl: Duration,
    feeds: RwLock<HashMap<String, FeedSession>>,
}

impl AppState {
    pub fn new(platform: Arc<dyn VideoPlatform>, scroll: ScrollTrigger, feed_ttl: Duration) -> Self {
        Self {
            platform,
            scroll,
            feed_ttl,
            feeds: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a feed for `query` driven by its own task.
    ///
    /// The first page is already in flight when this returns, so the
    /// returned view shows the initial loading state.
    pub fn open_feed(&self, query: Option<String>) -> (String, FeedView) {
        let feed = Feed::new(self.platform.clone(), self.scroll);
        feed.set_query(query.clone());
        feed.spawn_fetch();
        let view = feed.view();

        let (query_tx, query_rx) = watch::channel(query);
        let (more_tx, more_rx) = async_channel::bounded(1);
        tokio::spawn(drive(feed.clone(), query_rx, more_rx));

        let feed_id = new_feed_id();
        self.feeds.write().insert(
            feed_id.clone(),
            FeedSession {
                feed,
                query_tx,
                more_tx,
                last_access: Mutex::new(Instant::now()),
            },
        );
        (feed_id, view)
    }

    /// Runs `f` on the feed `feed_id`, counting as an access.
    pub fn with_feed<R>(&self, feed_id: &str, f: impl FnOnce(&FeedSession) -> R) -> Option<R> {
        let feeds = self.feeds.read();
        let session = feeds.get(feed_id)?;
        *session.last_access.lock() = Instant::now();
        Some(f(session))
    }

    pub fn close_feed(&self, feed_id: &str) -> bool {
        self.feeds.write().remove(feed_id).is_some()
    }

    /// Closes every feed idle for at least `feed_ttl` as of `now`.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let mut feeds = self.feeds.write();
        let before = feeds.len();
        feeds.retain(|_, session| {
            now.saturating_duration_since(*session.last_access.lock()) < self.feed_ttl
        });

        let evicted = before - feeds.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = feeds.len(), "idle feeds closed");
        }
        evicted
    }
}

/// Periodically closes idle feeds. Stops once `state` is dropped.
pub fn spawn_feed_sweeper(state: &Arc<AppState>) -> JoinHandle<()> {
    let period = (state.feed_ttl / 2).max(MIN_SWEEP_PERIOD);
    let state = Arc::downgrade(state);

    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(period);
        loop {
            ticks.tick().await;
            let Some(state) = state.upgrade() else {
                break;
            };
            state.evict_idle(Instant::now());
        }
    })
}

/// A feed owned by one client; dropping it stops the driver task.
pub struct FeedSession {
    pub feed: Feed,
    pub query_tx: watch::Sender<Option<String>>,
    pub more_tx: async_channel::Sender<()>,
    last_access: Mutex<Instant>,
}

fn new_feed_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FEED_ID_LEN)
        .map(char::from)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedRequest {
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MoreRequest {
    /// Index of the last row on screen; without it more is always requested.
    pub last_visible_row: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FeedCreatedResponse {
    pub feed_id: String,
    pub view: FeedView,
}

#[derive(Debug, Serialize)]
pub struct FeedMoreResponse {
    /// Whether a fetch of the next page was requested.
    pub requested: bool,
    pub view: FeedView,
}

#[derive(Debug, Deserialize)]
pub struct ChannelLookupRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoLookupRequest {
    pub id: String,
}
