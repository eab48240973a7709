use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One image of a media item at a given resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageDescriptor {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub url: String,
}

/// Resolution label (`default`, `medium`, `high`, ...) to image.
pub type Thumbnails = BTreeMap<String, ImageDescriptor>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
}

/// A row of the search results list.
///
/// `duration`, `views` and `channel.thumbnail` hold placeholders until the
/// row has been enriched with channel and video details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub published_at: String,
    pub channel: ChannelSummary,
    pub duration: String,
    pub thumbnail: Option<String>,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDetail {
    pub id: String,
    pub thumbnails: Thumbnails,
    pub title: String,
    pub description: String,
    pub subscriber_count: u64,
    pub video_count: u64,
    pub banner_url: Option<String>,
}

impl ChannelDetail {
    pub fn default_thumbnail(&self) -> Option<&str> {
        self.thumbnails.get("default").map(|image| image.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetail {
    pub id: String,
    pub duration: String,
    // left as returned by the API, parsed when merged into a row
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub results: Vec<SearchResult>,
    pub next_page_token: Option<String>,
}

/// Channel header shown on a channel page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelDetails {
    pub id: String,
    pub banner_url: Option<String>,
    pub profile_url: Option<String>,
    pub name: String,
    pub subscribers: u64,
    pub num_of_videos: u64,
    pub desc: String,
}

impl From<ChannelDetail> for ChannelDetails {
    fn from(channel: ChannelDetail) -> Self {
        let profile_url = channel.default_thumbnail().map(str::to_string);
        ChannelDetails {
            id: channel.id,
            banner_url: channel.banner_url,
            profile_url,
            name: channel.title,
            subscribers: channel.subscriber_count,
            num_of_videos: channel.video_count,
            desc: channel.description,
        }
    }
}

/// Full record of a single video from `videos.list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: u32,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: String,
    pub like_count: u64,
    pub view_count: u64,
    pub comment_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorChannelDetails {
    pub id: String,
    pub name: String,
    pub profile_url: String,
    pub total_subscribers: u64,
}

/// Header of a video page: the video plus its author's channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub category_id: u32,
    pub author_channel_details: AuthorChannelDetails,
    pub published_at: String,
    pub like_count: u64,
    pub view_count: u64,
    pub comment_count: u64,
}

impl VideoDetails {
    /// Without a channel record the author falls back to the name on the video.
    pub fn new(video: VideoInfo, author: Option<&ChannelDetail>) -> Self {
        let author_channel_details = match author {
            Some(channel) => AuthorChannelDetails {
                id: channel.id.clone(),
                name: channel.title.clone(),
                profile_url: channel.default_thumbnail().unwrap_or_default().to_string(),
                total_subscribers: channel.subscriber_count,
            },
            None => AuthorChannelDetails {
                id: video.channel_id.clone(),
                name: video.channel_title.clone(),
                profile_url: String::new(),
                total_subscribers: 0,
            },
        };

        VideoDetails {
            id: video.id,
            title: video.title,
            desc: video.description,
            category_id: video.category_id,
            author_channel_details,
            published_at: video.published_at,
            like_count: video.like_count,
            view_count: video.view_count,
            comment_count: video.comment_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_info() -> VideoInfo {
        VideoInfo {
            id: "v1".to_string(),
            title: "Cats!".to_string(),
            description: "d".to_string(),
            category_id: 15,
            channel_id: "c1".to_string(),
            channel_title: "Cat Channel".to_string(),
            published_at: "2021-01-01T00:00:00Z".to_string(),
            like_count: 7,
            view_count: 42,
            comment_count: 3,
        }
    }

    #[test]
    fn test_video_details_with_author_channel() {
        let mut thumbnails = Thumbnails::new();
        thumbnails.insert(
            "default".to_string(),
            ImageDescriptor { width: 88, height: 88, url: "cu1".to_string() },
        );
        let channel = ChannelDetail {
            id: "c1".to_string(),
            thumbnails,
            title: "Cats Inc".to_string(),
            description: String::new(),
            subscriber_count: 1200,
            video_count: 34,
            banner_url: None,
        };

        let details = VideoDetails::new(video_info(), Some(&channel));

        assert_eq!(details.id, "v1");
        assert_eq!(details.category_id, 15);
        assert_eq!(details.view_count, 42);
        assert_eq!(details.author_channel_details, AuthorChannelDetails {
            id: "c1".to_string(),
            name: "Cats Inc".to_string(),
            profile_url: "cu1".to_string(),
            total_subscribers: 1200,
        });
    }

    #[test]
    fn test_video_details_without_author_channel() {
        let details = VideoDetails::new(video_info(), None);

        let author = details.author_channel_details;
        assert_eq!(author.id, "c1");
        assert_eq!(author.name, "Cat Channel");
        assert_eq!(author.profile_url, "");
        assert_eq!(author.total_subscribers, 0);
    }
}
