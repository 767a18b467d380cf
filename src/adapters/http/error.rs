//! Uniform mapping from domain errors to HTTP responses.
//!
//! | Category       | Status |
//! |----------------|--------|
//! | Validation     | 400    |
//! | Authorization  | 401    |
//! | NotFound       | 404    |
//! | Conflict       | 409    |
//! | Infrastructure | 500    |
//!
//! Infrastructure failures are logged with their cause and answered with a
//! generic body.

use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::event::EventError;
use crate::domain::foundation::{
    AccessError, DomainError, ErrorCategory, ErrorCode, ValidationError,
};
use crate::domain::notification::SubscriptionError;
use crate::domain::preference::PreferenceError;
use crate::domain::publishing::PublishingError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Any failure a handler can return.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn status(&self) -> StatusCode {
        match self.0.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Authorization => StatusCode::UNAUTHORIZED,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = %self.0.code, error = %self.0.message, "request failed");
            ErrorResponse {
                code: ErrorCode::InternalError.to_string(),
                message: "An internal error occurred".to_string(),
            }
        } else {
            ErrorResponse {
                code: self.0.code.to_string(),
                message: self.0.message,
            }
        };

        (status, Json(body)).into_response()
    }
}

macro_rules! api_error_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    ApiError(err.into())
                }
            }
        )*
    };
}

api_error_from!(
    EventError,
    PublishingError,
    PreferenceError,
    SubscriptionError,
    AccessError,
    ValidationError,
);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

/// Parses a path segment, answering 400 when it is malformed.
pub fn parse_path<T: FromStr>(raw: &str, field: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, format!("'{}' is not a valid {}", raw, field)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CampaignGuid, EventGuid, UserId};

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(EventError::not_found(EventGuid::new()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn capacity_conflicts_map_to_409() {
        let full = ApiError::from(EventError::already_full(EventGuid::new(), 3));
        let below = ApiError::from(EventError::capacity_below_participants(1, 2));

        assert_eq!(full.status(), StatusCode::CONFLICT);
        assert_eq!(below.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn incorrect_event_type_is_a_bad_request() {
        let err = ApiError::from(PublishingError::incorrect_event_type(EventGuid::new()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn access_errors_map_to_401() {
        let boundary = ApiError::from(AccessError::boundary_violation(EventGuid::new(), CampaignGuid::new()));
        let creator = ApiError::from(AccessError::not_event_creator(user(1), EventGuid::new()));

        assert_eq!(boundary.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(creator.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let err = ApiError::from(DomainError::database("connection reset"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_body_hides_cause() {
        let response = ApiError::from(DomainError::database("password=hunter2")).into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(!body.message.contains("hunter2"));
    }

    #[test]
    fn malformed_path_segment_is_a_bad_request() {
        let err = parse_path::<EventGuid>("not-a-guid", "event_guid").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
