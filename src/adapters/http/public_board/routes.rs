//! Route configuration for the public board.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    announcements_search, events_search, notification_settings, public_board,
    subscribe_for_notifications, unsubscribe_from_notifications, update_notification_settings,
};

/// Creates the public board router, to be nested under `/public-board`.
pub fn public_board_router() -> Router<AppState> {
    Router::new()
        .route("/", get(public_board))
        .route("/events-search", get(events_search))
        .route("/announcements-search", get(announcements_search))
        .route(
            "/subscribe-for-notifications/:campaign",
            post(subscribe_for_notifications),
        )
        .route(
            "/update-notification-settings/:campaign",
            put(update_notification_settings),
        )
        .route(
            "/unsubscribe-from-notifications/:campaign",
            delete(unsubscribe_from_notifications),
        )
        .route("/notification-settings", get(notification_settings))
}
