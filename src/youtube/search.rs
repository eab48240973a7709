use reqwest::Client;
use serde::Deserialize;
use crate::errors::YouTubeError;
use crate::models::Thumbnails;
use super::{check_status, API_BASE};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub items: Vec<SearchHit>,
}

/// A raw `search.list` item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: HitId,
    #[serde(default)]
    pub snippet: HitSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitId {
    // absent for channel and playlist hits
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "publishedAt", default)]
    pub published_at: String,
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

pub async fn search_videos(
    client: &Client,
    query: &str,
    api_key: &str,
    page_token: Option<&str>,
    max_results: u32,
) -> Result<SearchResponse, YouTubeError> {
    let url = format!("{}/search", API_BASE);
    let max_results = max_results.to_string();

    let mut request = client
        .get(&url)
        .query(&[
            ("part", "snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results.as_str()),
        ])
        .header("X-Goog-Api-Key", api_key)
        .header("X-Goog-Fieldmask", "nextPageToken,items(id.videoId,snippet(title,description,publishedAt,channelId,channelTitle,thumbnails))");

    if let Some(token) = page_token {
        request = request.query(&[("pageToken", token)]);
    }

    tracing::debug!(query, page_token, "search.list");

    let resp = request.send().await?;
    let resp = check_status(resp, "search.list").await?;

    resp.json::<SearchResponse>()
        .await
        .map_err(|e| YouTubeError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::get_api_key;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "nextPageToken": "T2",
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "v1"},
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
                },
                {
                    "id": {"kind": "youtube#channel", "channelId": "c9"},
                    "snippet": {"title": "A channel"}
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.next_page_token.as_deref(), Some("T2"));
        assert_eq!(response.items.len(), 2);

        let first = &response.items[0];
        assert_eq!(first.id.video_id.as_deref(), Some("v1"));
        assert_eq!(first.snippet.channel_title, "Cat Channel");
        assert_eq!(first.snippet.thumbnails["high"].width, 480);

        let second = &response.items[1];
        assert!(second.id.video_id.is_none());
        assert!(second.snippet.thumbnails.is_empty());
    }

    #[test]
    fn test_parse_last_page_without_token() {
        let response: SearchResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(response.next_page_token.is_none());
        assert!(response.items.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires API_KEY and network access"]
    async fn test_search_videos_live() {
        let client = Client::new();
        let result = search_videos(&client, "cats", &get_api_key(), None, 5).await;

        match result {
            Ok(response) => {
                assert!(!response.items.is_empty());
                assert!(response.next_page_token.is_some());
            }
            Err(e) => panic!("Expected successful response, got error: {:?}", e),
        }
    }
}
