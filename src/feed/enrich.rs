use std::collections::HashMap;
use crate::models::{ChannelDetail, SearchResult, VideoDetail};

/// Fills the placeholder fields of `results` from the detail batches.
///
/// Rows keep their length and order. A row without a matching record keeps
/// its placeholders; on duplicate ids in a batch the first record wins.
pub fn enrich_results(
    results: &[SearchResult],
    channels: &[ChannelDetail],
    videos: &[VideoDetail],
) -> Vec<SearchResult> {
    let mut channels_by_id: HashMap<&str, &ChannelDetail> = HashMap::with_capacity(channels.len());
    for channel in channels {
        channels_by_id.entry(channel.id.as_str()).or_insert(channel);
    }

    let mut videos_by_id: HashMap<&str, &VideoDetail> = HashMap::with_capacity(videos.len());
    for video in videos {
        videos_by_id.entry(video.id.as_str()).or_insert(video);
    }

    results
        .iter()
        .map(|result| {
            let mut enriched = result.clone();

            if let Some(channel) = channels_by_id.get(result.channel.id.as_str()) {
                enriched.channel.thumbnail = channel
                    .default_thumbnail()
                    .unwrap_or_default()
                    .to_string();
            }

            if let Some(video) = videos_by_id.get(result.id.as_str()) {
                enriched.duration = video.duration.clone();
                enriched.views = video.view_count
                    .as_deref()
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or_default();
            }

            enriched
        })
        .collect()
}
