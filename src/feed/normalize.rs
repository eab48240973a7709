use crate::models::{ChannelSummary, SearchResult};
use crate::youtube::search::SearchHit;
use crate::youtube::thumbnails::best_thumbnail_url;

/// Ids collected from one page of hits, in page order, for the detail lookups.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdBatches {
    pub channel_ids: Vec<String>,
    pub video_ids: Vec<String>,
}

/// Turns a raw search hit into a placeholder row and records its ids.
///
/// Returns `None` for hits that are not videos.
pub fn normalize_hit(hit: SearchHit, ids: &mut IdBatches) -> Option<SearchResult> {
    let video_id = hit.id.video_id?;
    let snippet = hit.snippet;

    ids.channel_ids.push(snippet.channel_id.clone());
    ids.video_ids.push(video_id.clone());

    let thumbnail = best_thumbnail_url(snippet.thumbnails.values()).map(str::to_string);

    Some(SearchResult {
        id: video_id,
        title: snippet.title,
        desc: snippet.description,
        published_at: snippet.published_at,
        channel: ChannelSummary {
            id: snippet.channel_id,
            title: snippet.channel_title,
            thumbnail: String::new(),
        },
        duration: String::new(),
        thumbnail,
        views: 0,
    })
}

/// Placeholder rows of one page plus the ids to look up for them.
#[derive(Debug, Default)]
pub struct NormalizedPage {
    pub results: Vec<SearchResult>,
    pub ids: IdBatches,
    /// Hits dropped because they carried no video id.
    pub skipped: usize,
}

pub fn normalize_page(hits: Vec<SearchHit>) -> NormalizedPage {
    let mut page = NormalizedPage {
        results: Vec::with_capacity(hits.len()),
        ..Default::default()
    };

    for hit in hits {
        match normalize_hit(hit, &mut page.ids) {
            Some(result) => page.results.push(result),
            None => page.skipped += 1,
        }
    }

    if page.skipped > 0 {
        tracing::warn!(skipped = page.skipped, "search hits without a video id were skipped");
    }
    page
}
