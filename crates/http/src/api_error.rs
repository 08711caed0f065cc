//! Typed error for HTTP handlers.
//!
//! Converts service errors into HTML error pages with the matching status
//! code. Handlers return `Result<Response, ApiError>`.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use quakedb_service::ServiceError;

/// `Internal` logs the real error server-side and shows a static message,
/// so database details never reach the browser.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: a form field or CSV row failed validation.
    BadRequest(String),
    /// 413 Payload Too Large: upload exceeded the configured body limit.
    PayloadTooLarge(String),
    /// 422 Unprocessable Entity: well-formed but rejected (duplicate id).
    UnprocessableEntity(String),
    /// 500 Internal Server Error: details logged, not exposed.
    Internal(anyhow::Error),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg) | Self::PayloadTooLarge(msg) | Self::UnprocessableEntity(msg) => {
                msg
            },
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                "internal server error".to_owned()
            },
        };
        let title = status.canonical_reason().map_or_else(
            || status.as_u16().to_string(),
            |reason| format!("{} {reason}", status.as_u16()),
        );
        match crate::views::error_page(&title, &message) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("failed to render error page: {e}");
                (status, message).into_response()
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_duplicate() {
            return Self::UnprocessableEntity(
                "an earthquake with this id already exists".to_owned(),
            );
        }
        match err {
            ServiceError::Validation(e) => Self::BadRequest(e.to_string()),
            ServiceError::InvalidRow { .. } | ServiceError::Csv(_) => {
                Self::BadRequest(err.to_string())
            },
            ServiceError::InvalidUpload(msg) => Self::BadRequest(msg),
            ServiceError::Storage(_) | ServiceError::Io(_) => Self::Internal(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use quakedb_core::ValidationError;
    use quakedb_storage::StorageError;

    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation(ValidationError::missing("id")), StatusCode::BAD_REQUEST),
            (
                ServiceError::InvalidRow {
                    row: 1,
                    line: 2,
                    source: ValidationError::missing("time"),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Storage(StorageError::Duplicate("earthquakes_pkey".to_owned())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::Storage(StorageError::Migration("boom".to_owned())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Io(std::io::Error::other("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let err = ApiError::from(ServiceError::Storage(StorageError::Migration(
            "password authentication failed for user quakedb".to_owned(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("internal server error"));
        assert!(!html.contains("password"));
    }

    #[tokio::test]
    async fn bad_request_names_the_field() {
        let response =
            ApiError::from(ServiceError::Validation(ValidationError::new("mag", "not a number")))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("mag: not a number"));
    }
}
