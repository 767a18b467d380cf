//! Route configuration for publishing endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    campaign_announcements_campaign_member, campaign_announcements_general,
    campaign_published_events_campaign_member, campaign_published_events_general,
    publish_announcement, publish_event, unpublish_announcement, unpublish_event,
};

/// Creates the publishing router, to be nested under `/publishing`.
pub fn publishing_router() -> Router<AppState> {
    Router::new()
        .route("/publish-event/:event/:campaign", post(publish_event))
        .route("/unpublish-event/:event/:campaign", post(unpublish_event))
        .route("/publish-announcement/:campaign", post(publish_announcement))
        .route(
            "/unpublish-announcement/:announcement/:campaign",
            post(unpublish_announcement),
        )
        .route(
            "/campaign-published-events-campaign-member/:campaign",
            get(campaign_published_events_campaign_member),
        )
        .route(
            "/campaign-published-events-general/:campaign",
            get(campaign_published_events_general),
        )
        .route(
            "/campaign-published-announcements-campaign-member/:campaign",
            get(campaign_announcements_campaign_member),
        )
        .route(
            "/campaign-published-announcements-general/:campaign",
            get(campaign_announcements_general),
        )
}
