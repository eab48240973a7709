pub mod channels;
pub mod search;
pub mod thumbnails;
pub mod videos;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use crate::errors::YouTubeError;
use crate::models::{ChannelDetail, VideoDetail, VideoInfo};
use self::search::SearchResponse;

pub const API_BASE: &str = "https://youtube.googleapis.com/youtube/v3";

/// Maximum number of ids accepted by a single `channels.list` / `videos.list` call.
pub const MAX_IDS_PER_REQUEST: usize = 50;

const QUOTA_EXCEEDED_PREFIX: &str = "The request cannot be completed because you have exceeded your";

/// The three calls the search feed is built from.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    async fn search(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchResponse, YouTubeError>;

    /// Order of the returned records is not guaranteed to match `ids`.
    async fn channels_by_ids(&self, ids: &[String]) -> Result<Vec<ChannelDetail>, YouTubeError>;

    /// Order of the returned records is not guaranteed to match `ids`.
    async fn videos_by_ids(&self, ids: &[String]) -> Result<Vec<VideoDetail>, YouTubeError>;

    /// Full record of one video, `None` if the id is unknown.
    async fn video_info(&self, id: &str) -> Result<Option<VideoInfo>, YouTubeError>;
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    max_results: u32,
}

impl YouTubeClient {
    pub fn new(client: Client, api_key: impl Into<String>, max_results: u32) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            max_results,
        }
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchResponse, YouTubeError> {
        search::search_videos(&self.client, query, &self.api_key, page_token, self.max_results).await
    }

    async fn channels_by_ids(&self, ids: &[String]) -> Result<Vec<ChannelDetail>, YouTubeError> {
        channels::get_channels_by_ids(&self.client, ids, &self.api_key).await
    }

    async fn videos_by_ids(&self, ids: &[String]) -> Result<Vec<VideoDetail>, YouTubeError> {
        videos::get_videos_by_ids(&self.client, ids, &self.api_key).await
    }

    async fn video_info(&self, id: &str) -> Result<Option<VideoInfo>, YouTubeError> {
        videos::get_video_info(&self.client, id, &self.api_key).await
    }
}

/// Statistics arrive as decimal strings; hidden or malformed counts read as 0.
pub(crate) fn parse_count(value: Option<&String>) -> u64 {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps a Data API response status onto `YouTubeError`, passing 200 responses through.
pub(crate) async fn check_status(resp: Response, endpoint: &str) -> Result<Response, YouTubeError> {
    match resp.status() {
        StatusCode::OK => Ok(resp),
        StatusCode::TOO_MANY_REQUESTS => Err(YouTubeError::Ratelimited),
        StatusCode::FORBIDDEN => {
            let error_response: ErrorResponse = resp
                .json()
                .await
                .map_err(|e| YouTubeError::ParseError(e.to_string()))?;

            if error_response.error.message.starts_with(QUOTA_EXCEEDED_PREFIX) {
                tracing::warn!(endpoint, "quota exceeded");
                return Err(YouTubeError::Ratelimited);
            }
            Err(YouTubeError::Forbidden)
        }
        StatusCode::NOT_FOUND => Err(YouTubeError::NotFound),
        StatusCode::UNAUTHORIZED => Err(YouTubeError::Unauthorized),
        StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
            Err(YouTubeError::InternalServerError)
        }
        status => {
            let body = resp
                .text()
                .await
                .map_err(|e| YouTubeError::ParseError(e.to_string()))?;
            tracing::error!(endpoint, status = status.as_u16(), %body, "unknown status code");
            Err(YouTubeError::UnknownStatusCode(status))
        }
    }
}

#[cfg(test)]
pub(crate) fn get_api_key() -> String {
    dotenvy::dotenv().ok();
    std::env::var("API_KEY").expect("API_KEY must be set")
}
