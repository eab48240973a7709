use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use crate::errors::YouTubeError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    YouTubeError(YouTubeError),
    InvalidRequest(String),
    NotFound(String),
}

impl From<YouTubeError> for ApiError {
    fn from(err: YouTubeError) -> Self {
        ApiError::YouTubeError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::YouTubeError(err) => {
                let status = match err {
                    YouTubeError::NotFound => StatusCode::NOT_FOUND,
                    YouTubeError::Ratelimited => StatusCode::TOO_MANY_REQUESTS,
                    YouTubeError::Unauthorized => StatusCode::UNAUTHORIZED,
                    YouTubeError::Forbidden => StatusCode::FORBIDDEN,
                    YouTubeError::InternalServerError
                    | YouTubeError::UnknownStatusCode(_)
                    | YouTubeError::ParseError(_)
                    | YouTubeError::Other(_) => StatusCode::BAD_GATEWAY,
                };

                (status, Json(json!({
                    "error": err.code(),
                    "message": err.to_string(),
                    "retryable": err.is_retryable(),
                }))).into_response()
            },
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({
                    "error": "invalid_request",
                    "message": msg
                }))).into_response()
            },
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({
                    "error": "not_found",
                    "message": msg
                }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::from(YouTubeError::Ratelimited), StatusCode::TOO_MANY_REQUESTS),
            (ApiError::from(YouTubeError::NotFound), StatusCode::NOT_FOUND),
            (ApiError::from(YouTubeError::InternalServerError), StatusCode::BAD_GATEWAY),
            (ApiError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("gone".to_string()), StatusCode::NOT_FOUND),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
