use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use wordtally_shared::BOT_TOKEN_HEADER;

use crate::AppState;
use crate::error::ApiError;

fn extract_bot_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(BOT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// Rejects `/api` calls without the shared bot token when one is configured.
pub async fn require_bot_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    match extract_bot_token(&headers) {
        Some(token) if !token.is_empty() && token == expected => Ok(next.run(req).await),
        _ => {
            tracing::warn!("rejected {} {}: bad bot token", req.method(), req.uri().path());
            Err(ApiError::Unauthorized)
        }
    }
}
