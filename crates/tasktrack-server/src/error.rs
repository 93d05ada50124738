//! Mapping of tracker errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tasktrack_core::TrackerError;

/// Errors returned by request handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A tracker operation failed.
    Tracker(TrackerError),
    /// The request could not be extracted (bad JSON, form or query).
    Rejected { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Tracker(err) => status_for(err),
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

/// HTTP status for each error category.
pub fn status_for(err: &TrackerError) -> StatusCode {
    match err {
        TrackerError::Validation(_)
        | TrackerError::Conflict(_)
        | TrackerError::Forbidden(_)
        | TrackerError::InvalidCredential => StatusCode::UNPROCESSABLE_ENTITY,
        TrackerError::UserNotFound(_) => StatusCode::BAD_REQUEST,
        TrackerError::TaskNotFound(_) => StatusCode::NOT_FOUND,
        TrackerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        TrackerError::Storage(_) | TrackerError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        ApiError::Tracker(err)
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),*) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Rejected {
                        status: rejection.status(),
                        detail: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

impl_from_rejection!(JsonRejection, FormRejection, QueryRejection);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Tracker(err) if !err.is_client_error() => {
                tracing::error!(error = %err, "request failed");
                "Internal Server Error".to_string()
            }
            ApiError::Tracker(err) => err.to_string(),
            ApiError::Rejected { detail, .. } => detail.clone(),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
