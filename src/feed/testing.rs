//! In-memory `VideoPlatform` for exercising the feed without the network.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Barrier, Notify};
use crate::errors::YouTubeError;
use crate::models::{ChannelDetail, ImageDescriptor, Thumbnails, VideoDetail, VideoInfo};
use crate::youtube::search::{HitId, HitSnippet, SearchHit, SearchResponse};
use crate::youtube::VideoPlatform;

type PageKey = (String, Option<String>);

#[derive(Default)]
pub struct MockPlatform {
    pages: HashMap<PageKey, SearchResponse>,
    channels: Vec<ChannelDetail>,
    videos: Vec<VideoDetail>,
    video_infos: Vec<VideoInfo>,
    search_failures: Mutex<VecDeque<YouTubeError>>,
    video_failures: Mutex<usize>,
    holds: Mutex<HashMap<String, Arc<Notify>>>,
    detail_barrier: Option<Arc<Barrier>>,
    search_calls: Mutex<Vec<PageKey>>,
    channel_calls: Mutex<Vec<Vec<String>>>,
    video_calls: Mutex<Vec<Vec<String>>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, query: &str, token: Option<&str>, response: SearchResponse) -> Self {
        self.pages.insert((query.to_string(), token.map(str::to_string)), response);
        self
    }

    pub fn with_channel(mut self, channel: ChannelDetail) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn with_video(mut self, video: VideoDetail) -> Self {
        self.videos.push(video);
        self
    }

    pub fn with_video_info(mut self, video: VideoInfo) -> Self {
        self.video_infos.push(video);
        self
    }

    pub fn with_detail_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.detail_barrier = Some(barrier);
        self
    }

    pub fn fail_next_search(&self, err: YouTubeError) {
        self.search_failures.lock().push_back(err);
    }

    pub fn fail_next_video_lookup(&self) {
        *self.video_failures.lock() += 1;
    }

    /// Makes searches for `query` wait until the returned handle is notified.
    pub fn hold(&self, query: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.holds.lock().insert(query.to_string(), notify.clone());
        notify
    }

    pub fn search_calls(&self) -> Vec<PageKey> {
        self.search_calls.lock().clone()
    }

    pub fn channel_calls(&self) -> Vec<Vec<String>> {
        self.channel_calls.lock().clone()
    }

    pub fn video_calls(&self) -> Vec<Vec<String>> {
        self.video_calls.lock().clone()
    }
}

#[async_trait]
impl VideoPlatform for MockPlatform {
    async fn search(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchResponse, YouTubeError> {
        let key = (query.to_string(), page_token.map(str::to_string));
        self.search_calls.lock().push(key.clone());

        let hold = self.holds.lock().get(query).cloned();
        if let Some(notify) = hold {
            notify.notified().await;
        }

        if let Some(err) = self.search_failures.lock().pop_front() {
            return Err(err);
        }

        self.pages.get(&key).cloned().ok_or(YouTubeError::NotFound)
    }

    async fn channels_by_ids(&self, ids: &[String]) -> Result<Vec<ChannelDetail>, YouTubeError> {
        self.channel_calls.lock().push(ids.to_vec());
        if let Some(barrier) = &self.detail_barrier {
            barrier.wait().await;
        }

        // reversed, since the real API does not promise input order either
        Ok(self.channels
            .iter()
            .rev()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn videos_by_ids(&self, ids: &[String]) -> Result<Vec<VideoDetail>, YouTubeError> {
        self.video_calls.lock().push(ids.to_vec());
        if let Some(barrier) = &self.detail_barrier {
            barrier.wait().await;
        }

        {
            let mut failures = self.video_failures.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(YouTubeError::InternalServerError);
            }
        }

        Ok(self.videos
            .iter()
            .rev()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn video_info(&self, id: &str) -> Result<Option<VideoInfo>, YouTubeError> {
        Ok(self.video_infos.iter().find(|v| v.id == id).cloned())
    }
}

pub fn hit(video_id: &str, channel_id: &str) -> SearchHit {
    SearchHit {
        id: HitId { video_id: Some(video_id.to_string()) },
        snippet: HitSnippet {
            title: format!("video {}", video_id),
            channel_id: channel_id.to_string(),
            channel_title: format!("channel {}", channel_id),
            ..Default::default()
        },
    }
}

pub fn response(items: Vec<SearchHit>, next_page_token: Option<&str>) -> SearchResponse {
    SearchResponse {
        next_page_token: next_page_token.map(str::to_string),
        items,
    }
}

pub fn channel(id: &str, default_url: &str) -> ChannelDetail {
    let mut thumbnails = Thumbnails::new();
    thumbnails.insert(
        "default".to_string(),
        ImageDescriptor { width: 88, height: 88, url: default_url.to_string() },
    );
    ChannelDetail {
        id: id.to_string(),
        thumbnails,
        title: String::new(),
        description: String::new(),
        subscriber_count: 0,
        video_count: 0,
        banner_url: None,
    }
}

pub fn video(id: &str, duration: &str, view_count: &str) -> VideoDetail {
    VideoDetail {
        id: id.to_string(),
        duration: duration.to_string(),
        view_count: Some(view_count.to_string()),
    }
}

pub fn video_info(id: &str, channel_id: &str) -> VideoInfo {
    VideoInfo {
        id: id.to_string(),
        title: format!("video {}", id),
        description: String::new(),
        category_id: 15,
        channel_id: channel_id.to_string(),
        channel_title: format!("channel {}", channel_id),
        published_at: "2021-01-01T00:00:00Z".to_string(),
        like_count: 7,
        view_count: 42,
        comment_count: 3,
    }
}

/// The "cats" query: one result on the first page, continued by token `T2`.
pub fn cats_platform() -> MockPlatform {
    let body = r#"{
        "items": [{
            "id": {"videoId": "v1"},
            "snippet": {
                "channelId": "c1",
                "channelTitle": "Cat Channel",
                "title": "Cats!",
                "description": "d",
                "publishedAt": "2021-01-01",
                "thumbnails": {
                    "default": {"width": 120, "height": 90, "url": "u1"},
                    "high": {"width": 480, "height": 360, "url": "u2"}
                }
            }
        }],
        "nextPageToken": "T2"
    }"#;
    let first_page: SearchResponse = serde_json::from_str(body).expect("valid fixture");

    MockPlatform::new()
        .with_page("cats", None, first_page)
        .with_channel(channel("c1", "cu1"))
        .with_video(video("v1", "PT1M", "42"))
}
