//! Route configuration for preference endpoints.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{add_preference, list_preferences, remove_preference, update_preference};

/// Creates the preference router, to be nested under `/preferences`.
pub fn preference_router() -> Router<AppState> {
    Router::new()
        .route("/add/:campaign", post(add_preference))
        .route("/update/:campaign", put(update_preference))
        .route("/remove/:campaign", delete(remove_preference))
        .route("/list", get(list_preferences))
}
