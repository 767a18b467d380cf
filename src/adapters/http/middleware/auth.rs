//! Caller identity extractors for axum.
//!
//! Session management lives in front of this service. The gateway forwards
//! the authenticated user id in the `X-User-Id` header and these extractors
//! read it:
//!
//! - `CurrentUser` - Requires the header, 401 otherwise
//! - `OptionalUser` - Anonymous when the header is absent or malformed
//!
//! # Example
//!
//! ```ignore
//! async fn my_events(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user)
//! }
//! ```

use axum::{
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::{ErrorCode, UserId};

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

fn user_from_headers(parts: &Parts) -> Option<UserId> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}

/// Extractor that requires an authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            user_from_headers(parts)
                .map(CurrentUser)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Extractor for optional authentication.
///
/// Public board endpoints personalize the ranking when a user is known and
/// fall back to the neutral ordering otherwise.
#[derive(Debug, Clone, Copy)]
pub struct OptionalUser(pub Option<UserId>);

impl<S> axum::extract::FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move { Ok(OptionalUser(user_from_headers(parts))) })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// Missing or malformed user header.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = match self {
            AuthRejection::Unauthenticated => ErrorResponse {
                code: ErrorCode::Unauthorized.to_string(),
                message: "Authentication required".to_string(),
            },
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (parts, _body) = builder.body(()).unwrap().into_parts();
        parts
    }

    // ════════════════════════════════════════════════════════════════════════════
    // CurrentUser Extractor Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn current_user_reads_header() {
        let mut parts = parts(Some("42"));

        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user, UserId::new(42).unwrap());
    }

    #[tokio::test]
    async fn current_user_fails_without_header() {
        let mut parts = parts(None);

        let result = CurrentUser::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    #[tokio::test]
    async fn current_user_rejects_non_positive_ids() {
        let mut parts = parts(Some("0"));

        let result = CurrentUser::from_request_parts(&mut parts, &()).await;

        assert!(result.is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // OptionalUser Extractor Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn optional_user_is_none_when_malformed() {
        let mut parts = parts(Some("abc"));

        let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user, None);
    }

    #[tokio::test]
    async fn optional_user_is_some_when_present() {
        let mut parts = parts(Some("7"));

        let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user, Some(UserId::new(7).unwrap()));
    }

    #[test]
    fn rejection_returns_401() {
        let response = AuthRejection::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
