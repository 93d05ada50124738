use crate::error::ApiError;
use axum::{
    extract::Request,
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tasktrack_core::{TrackerError, UserId, auth};

/// Identity resolved from the bearer token of a protected request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requester {
    pub user_id: UserId,
}

/// Axum middleware guarding protected routes:
/// - read `Authorization: Bearer <token>`
/// - resolve the token to a user id
/// - expose it to handlers as a [`Requester`] extension
pub async fn require_bearer(mut req: Request, next: Next) -> Response {
    let user_id = match requester_from_headers(req.headers()) {
        Ok(id) => id,
        Err(err) => return ApiError::from(err).into_response(),
    };

    req.extensions_mut().insert(Requester { user_id });
    next.run(req).await
}

fn requester_from_headers(headers: &HeaderMap) -> Result<UserId, TrackerError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(auth::bearer_from_header)
        .ok_or_else(|| TrackerError::Unauthorized("Not authenticated".to_string()))?;
    auth::resolve_token(token)
}
