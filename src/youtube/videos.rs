use reqwest::Client;
use serde::Deserialize;
use crate::models::{VideoDetail, VideoInfo};
use crate::errors::YouTubeError;
use super::{check_status, parse_count, API_BASE, MAX_IDS_PER_REQUEST};

#[derive(Debug, Deserialize)]
struct ApiResponse {
    items: Option<Vec<ApiVideo>>
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    id: String,
    statistics: Option<Statistics>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    items: Option<Vec<ApiVideoInfo>>
}

#[derive(Debug, Deserialize)]
struct ApiVideoInfo {
    id: String,
    snippet: Option<InfoSnippet>,
    statistics: Option<InfoStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InfoSnippet {
    category_id: String,
    title: String,
    description: String,
    channel_id: String,
    channel_title: String,
    published_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InfoStatistics {
    like_count: Option<String>,
    view_count: Option<String>,
    comment_count: Option<String>,
}

impl ApiVideoInfo {
    fn into_info(self) -> VideoInfo {
        let snippet = self.snippet.unwrap_or_default();
        let stats = self.statistics.as_ref();

        VideoInfo {
            id: self.id,
            category_id: snippet.category_id.parse().unwrap_or_default(),
            title: snippet.title,
            description: snippet.description,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            published_at: snippet.published_at,
            like_count: parse_count(stats.and_then(|s| s.like_count.as_ref())),
            view_count: parse_count(stats.and_then(|s| s.view_count.as_ref())),
            comment_count: parse_count(stats.and_then(|s| s.comment_count.as_ref())),
        }
    }
}

impl ApiVideo {
    fn into_detail(self) -> VideoDetail {
        VideoDetail {
            id: self.id,
            duration: self.content_details
                .and_then(|c| c.duration)
                .unwrap_or_default(),
            view_count: self.statistics.and_then(|s| s.view_count),
        }
    }
}

/// Looks up duration and view count for `video_ids`, 50 ids per request.
pub async fn get_videos_by_ids(
    client: &Client,
    video_ids: &[String],
    api_key: &str,
) -> Result<Vec<VideoDetail>, YouTubeError> {
    // If no videos, return early
    if video_ids.is_empty() {
        return Ok(Vec::new());
    }

    let url = format!("{}/videos", API_BASE);
    let mut videos = Vec::with_capacity(video_ids.len());

    // Create chunks of 50 videos (YouTube API limit)
    for chunk in video_ids.chunks(MAX_IDS_PER_REQUEST) {
        let ids = chunk.join(",");

        let request = client
            .get(&url)
            .query(&[("part", "contentDetails,statistics"), ("id", ids.as_str())])
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-Fieldmask", "items(id,contentDetails.duration,statistics.viewCount)");

        tracing::debug!(count = chunk.len(), "videos.list");

        let resp = request.send().await?;
        let resp = check_status(resp, "videos.list").await?;

        let api_response: ApiResponse = resp
            .json()
            .await
            .map_err(|e| YouTubeError::ParseError(e.to_string()))?;

        videos.extend(
            api_response.items
                .unwrap_or_default()
                .into_iter()
                .map(ApiVideo::into_detail),
        );
    }

    Ok(videos)
}

/// Looks up the snippet and statistics of a single video.
pub async fn get_video_info(
    client: &Client,
    video_id: &str,
    api_key: &str,
) -> Result<Option<VideoInfo>, YouTubeError> {
    let url = format!("{}/videos", API_BASE);

    let request = client
        .get(&url)
        .query(&[("part", "snippet,statistics"), ("id", video_id)])
        .header("X-Goog-Api-Key", api_key)
        .header("X-Goog-Fieldmask", "items(id,snippet(categoryId,title,description,channelId,channelTitle,publishedAt),statistics(likeCount,viewCount,commentCount))");

    tracing::debug!(video_id, "videos.list");

    let resp = request.send().await?;
    let resp = check_status(resp, "videos.list").await?;

    let api_response: InfoResponse = resp
        .json()
        .await
        .map_err(|e| YouTubeError::ParseError(e.to_string()))?;

    Ok(api_response.items
        .unwrap_or_default()
        .into_iter()
        .find(|video| video.id == video_id)
        .map(ApiVideoInfo::into_info))
}
