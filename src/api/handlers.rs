use axum::{
    routing::{get, post},
    Router,
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use crate::feed::{fetch_page, FeedView};
use crate::models::{ChannelDetails, Page, VideoDetails};
use super::types::{
    AppState, ChannelLookupRequest, FeedCreatedResponse, FeedMoreResponse, FeedRequest,
    MoreRequest, SearchRequest, VideoLookupRequest,
};
use super::error::ApiError;

type JsonPayload<T> = Result<Json<T>, axum::extract::rejection::JsonRejection>;

fn normalize_query(query: Option<String>) -> Option<String> {
    query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
}

/// One enriched page of results, without any server-side state.
async fn search_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonPayload<SearchRequest>,
) -> Result<Json<Page>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let Some(query) = normalize_query(payload.query) else {
        return Ok(Json(Page {
            results: Vec::new(),
            next_page_token: None,
        }));
    };

    let page = fetch_page(state.platform.as_ref(), &query, payload.page_token.as_deref()).await?;
    Ok(Json(page))
}

async fn create_feed_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonPayload<FeedRequest>,
) -> Result<(StatusCode, Json<FeedCreatedResponse>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let (feed_id, view) = state.open_feed(normalize_query(payload.query));
    tracing::info!(feed_id = %feed_id, "feed opened");

    Ok((StatusCode::CREATED, Json(FeedCreatedResponse { feed_id, view })))
}

fn feed_not_found() -> ApiError {
    ApiError::NotFound("Feed not found".to_string())
}

async fn feed_view_handler(
    State(state): State<Arc<AppState>>,
    Path(feed_id): Path<String>,
) -> Result<Json<FeedView>, ApiError> {
    let view = state
        .with_feed(&feed_id, |session| session.feed.view())
        .ok_or_else(feed_not_found)?;

    Ok(Json(view))
}

/// Asks for the next page once the client has scrolled close enough to the end.
async fn feed_more_handler(
    State(state): State<Arc<AppState>>,
    Path(feed_id): Path<String>,
    payload: JsonPayload<MoreRequest>,
) -> Result<(StatusCode, Json<FeedMoreResponse>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let (feed, more_tx) = state
        .with_feed(&feed_id, |session| (session.feed.clone(), session.more_tx.clone()))
        .ok_or_else(feed_not_found)?;

    let wanted = payload
        .last_visible_row
        .map_or(true, |row| feed.wants_more(row));
    if !wanted {
        let view = feed.view();
        return Ok((StatusCode::OK, Json(FeedMoreResponse { requested: false, view })));
    }

    // a full channel means a request is already pending
    if let Err(async_channel::TrySendError::Closed(_)) = more_tx.try_send(()) {
        return Err(ApiError::NotFound("Feed is closed".to_string()));
    }

    let view = feed.view();
    Ok((StatusCode::ACCEPTED, Json(FeedMoreResponse { requested: true, view })))
}

async fn feed_query_handler(
    State(state): State<Arc<AppState>>,
    Path(feed_id): Path<String>,
    payload: JsonPayload<FeedRequest>,
) -> Result<(StatusCode, Json<FeedView>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let (feed, sent) = state
        .with_feed(&feed_id, |session| {
            let sent = session.query_tx.send(normalize_query(payload.query)).is_ok();
            (session.feed.clone(), sent)
        })
        .ok_or_else(feed_not_found)?;

    if !sent {
        return Err(ApiError::NotFound("Feed is closed".to_string()));
    }

    Ok((StatusCode::ACCEPTED, Json(feed.view())))
}

async fn close_feed_handler(
    State(state): State<Arc<AppState>>,
    Path(feed_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.close_feed(&feed_id) {
        return Err(feed_not_found());
    }

    tracing::info!(feed_id = %feed_id, "feed closed");
    Ok(StatusCode::NO_CONTENT)
}

async fn channel_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonPayload<ChannelLookupRequest>,
) -> Result<Json<ChannelDetails>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let id = payload.id.trim().to_string();
    if id.is_empty() {
        return Err(ApiError::InvalidRequest("Channel id is required".to_string()));
    }

    let channel = state.platform
        .channels_by_ids(std::slice::from_ref(&id))
        .await?
        .into_iter()
        .find(|channel| channel.id == id)
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    Ok(Json(ChannelDetails::from(channel)))
}

/// The video plus its author's channel, looked up one after the other.
async fn video_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonPayload<VideoLookupRequest>,
) -> Result<Json<VideoDetails>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let id = payload.id.trim();
    if id.is_empty() {
        return Err(ApiError::InvalidRequest("Video id is required".to_string()));
    }

    let video = state.platform
        .video_info(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    let channel_ids = vec![video.channel_id.clone()];
    let channels = state.platform.channels_by_ids(&channel_ids).await?;
    let author = channels.iter().find(|channel| channel.id == video.channel_id);
    if author.is_none() {
        tracing::warn!(video_id = %video.id, channel_id = %video.channel_id, "author channel not found");
    }

    Ok(Json(VideoDetails::new(video, author)))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", post(search_handler))
        .route("/api/feeds", post(create_feed_handler))
        .route("/api/feeds/:id", get(feed_view_handler).delete(close_feed_handler))
        .route("/api/feeds/:id/more", post(feed_more_handler))
        .route("/api/feeds/:id/query", post(feed_query_handler))
        .route("/api/channel", post(channel_handler))
        .route("/api/video", post(video_handler))
        .with_state(state)
}
