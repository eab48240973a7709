use crate::errors::YouTubeError;
use crate::models::Page;
use crate::youtube::VideoPlatform;
use super::enrich::enrich_results;
use super::normalize::normalize_page;

/// Fetches and enriches one page of search results.
///
/// Channel and video details are looked up concurrently; the page is only
/// returned once both lookups have completed. Any failed call fails the
/// whole page.
pub async fn fetch_page(
    platform: &dyn VideoPlatform,
    query: &str,
    page_token: Option<&str>,
) -> Result<Page, YouTubeError> {
    let response = platform.search(query, page_token).await?;
    let normalized = normalize_page(response.items);

    let (channels, videos) = tokio::try_join!(
        platform.channels_by_ids(&normalized.ids.channel_ids),
        platform.videos_by_ids(&normalized.ids.video_ids),
    )?;

    tracing::debug!(
        query,
        results = normalized.results.len(),
        skipped = normalized.skipped,
        channels = channels.len(),
        videos = videos.len(),
        has_next = response.next_page_token.is_some(),
        "fetched page"
    );

    Ok(Page {
        results: enrich_results(&normalized.results, &channels, &videos),
        next_page_token: response.next_page_token,
    })
}
