//! Route configuration for event endpoints.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    add_campaign_event_participant, add_event_watcher, add_personal_or_open_event_participant,
    create_campaign_event, create_personal_event, delete_campaign_event, delete_personal_event,
    get_campaign_events, get_event, get_event_participants_campaign_event,
    get_event_participants_personal_event, get_personal_events, get_self_events,
    remove_event_participant_campaign_event, remove_event_participant_personal_event,
    remove_event_watcher, update_campaign_event, update_personal_event,
};

/// Creates the event router, to be nested under `/events`.
pub fn event_router() -> Router<AppState> {
    Router::new()
        .route("/create-personal-event", post(create_personal_event))
        .route("/create-campaign-event/:campaign", post(create_campaign_event))
        .route(
            "/update-personal-event/:event",
            patch(update_personal_event).put(update_personal_event),
        )
        .route(
            "/update-campaign-event/:campaign/:event",
            patch(update_campaign_event).put(update_campaign_event),
        )
        .route("/delete-personal-event/:event", delete(delete_personal_event))
        .route("/delete-campaign-event/:campaign/:event", delete(delete_campaign_event))
        .route(
            "/add-personal-or-open-event-participant/:event/:email",
            post(add_personal_or_open_event_participant),
        )
        .route(
            "/add-campaign-event-participant/:campaign/:event/:email",
            post(add_campaign_event_participant),
        )
        .route(
            "/remove-event-participant-personal-event/:event/:email",
            delete(remove_event_participant_personal_event),
        )
        .route(
            "/remove-event-participant-campaign-event/:campaign/:event/:email",
            delete(remove_event_participant_campaign_event),
        )
        .route("/add-event-watcher/:event", post(add_event_watcher))
        .route("/remove-event-watcher/:event", delete(remove_event_watcher))
        .route("/get-event/:event", get(get_event))
        .route(
            "/get-event-participants-personal-event/:event",
            get(get_event_participants_personal_event),
        )
        .route(
            "/get-event-participants-campaign-event/:campaign/:event",
            get(get_event_participants_campaign_event),
        )
        .route("/get-campaign-events/:campaign", get(get_campaign_events))
        .route("/get-personal-events", get(get_personal_events))
        .route("/get-self-events", get(get_self_events))
}
