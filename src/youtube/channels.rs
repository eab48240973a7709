use reqwest::Client;
use serde::Deserialize;
use crate::models::{ChannelDetail, Thumbnails};
use crate::errors::YouTubeError;
use super::{check_status, parse_count, API_BASE, MAX_IDS_PER_REQUEST};

#[derive(Debug, Deserialize)]
struct ApiResponse {
    items: Option<Vec<ApiChannel>>
}

#[derive(Debug, Deserialize)]
struct ApiChannel {
    id: String,
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
    #[serde(rename = "brandingSettings")]
    branding_settings: Option<BrandingSettings>
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount")]
    subscriber_count: Option<String>,
    #[serde(rename = "videoCount")]
    video_count: Option<String>
}

#[derive(Debug, Deserialize)]
struct BrandingSettings {
    image: Option<ChannelImage>
}

#[derive(Debug, Deserialize)]
struct ChannelImage {
    #[serde(rename = "bannerExternalUrl")]
    banner_external_url: Option<String>
}

impl ApiChannel {
    fn into_detail(self) -> ChannelDetail {
        let (title, description, thumbnails) = match self.snippet {
            Some(snippet) => (
                snippet.title.unwrap_or_default(),
                snippet.description.unwrap_or_default(),
                snippet.thumbnails,
            ),
            None => Default::default(),
        };

        ChannelDetail {
            id: self.id,
            thumbnails,
            title,
            description,
            subscriber_count: parse_count(
                self.statistics.as_ref().and_then(|s| s.subscriber_count.as_ref()),
            ),
            video_count: parse_count(
                self.statistics.as_ref().and_then(|s| s.video_count.as_ref()),
            ),
            banner_url: self.branding_settings
                .and_then(|b| b.image)
                .and_then(|i| i.banner_external_url),
        }
    }
}

/// Looks up channel details for `channel_ids`, 50 ids per request.
///
/// Unknown ids are simply missing from the result.
pub async fn get_channels_by_ids(
    client: &Client,
    channel_ids: &[String],
    api_key: &str,
) -> Result<Vec<ChannelDetail>, YouTubeError> {
    if channel_ids.is_empty() {
        return Ok(Vec::new());
    }

    let url = format!("{}/channels", API_BASE);
    let mut channels = Vec::with_capacity(channel_ids.len());

    for chunk in channel_ids.chunks(MAX_IDS_PER_REQUEST) {
        let ids = chunk.join(",");

        let request = client
            .get(&url)
            .query(&[("part", "snippet,statistics,brandingSettings"), ("id", ids.as_str())])
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-Fieldmask", "items(id,snippet(title,description,thumbnails),statistics(subscriberCount,videoCount),brandingSettings.image.bannerExternalUrl)");

        tracing::debug!(count = chunk.len(), "channels.list");

        let resp = request.send().await?;
        let resp = check_status(resp, "channels.list").await?;

        let api_response: ApiResponse = resp
            .json()
            .await
            .map_err(|e| YouTubeError::ParseError(e.to_string()))?;

        channels.extend(
            api_response.items
                .unwrap_or_default()
                .into_iter()
                .map(ApiChannel::into_detail),
        );
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::get_api_key;

    #[test]
    fn test_parse_channel_details() {
        let body = r#"{
            "items": [{
                "id": "c1",
                "snippet": {
                    "title": "Cat Channel",
                    "description": "All cats",
                    "thumbnails": {
                        "default": {"url": "cu1", "width": 88, "height": 88},
                        "high": {"url": "cu3", "width": 800, "height": 800}
                    }
                },
                "statistics": {"subscriberCount": "1200", "videoCount": "34"},
                "brandingSettings": {"image": {"bannerExternalUrl": "https://banner"}}
            }]
        }"#;

        let response: ApiResponse = serde_json::from_str(body).unwrap();
        let channel = response.items.unwrap().pop().unwrap().into_detail();

        assert_eq!(channel.id, "c1");
        assert_eq!(channel.title, "Cat Channel");
        assert_eq!(channel.default_thumbnail(), Some("cu1"));
        assert_eq!(channel.subscriber_count, 1200);
        assert_eq!(channel.video_count, 34);
        assert_eq!(channel.banner_url.as_deref(), Some("https://banner"));
    }

    #[test]
    fn test_parse_sparse_channel() {
        let body = r#"{"items": [{"id": "c2", "statistics": {"subscriberCount": "hidden"}}]}"#;

        let response: ApiResponse = serde_json::from_str(body).unwrap();
        let channel = response.items.unwrap().pop().unwrap().into_detail();

        assert_eq!(channel.id, "c2");
        assert_eq!(channel.title, "");
        assert_eq!(channel.default_thumbnail(), None);
        assert_eq!(channel.subscriber_count, 0);
        assert!(channel.banner_url.is_none());
    }

    #[tokio::test]
    async fn test_empty_id_list_skips_request() {
        let client = Client::new();
        let result = get_channels_by_ids(&client, &[], "unused").await;
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires API_KEY and network access"]
    async fn test_get_channel_by_id() {
        let client = Client::new();
        let ids = vec!["UCBR8-60-B28hp2BmDPdntcQ".to_string()];
        let channels = get_channels_by_ids(&client, &ids, &get_api_key())
            .await
            .expect("channels.list failed");

        assert_eq!(channels.len(), 1);
        assert!(channels[0].default_thumbnail().is_some());
    }
}
