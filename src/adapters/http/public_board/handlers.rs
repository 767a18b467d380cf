//! HTTP handlers for the public board and campaign notification
//! subscriptions.
//!
//! Board reads accept anonymous callers; a known caller gets the feed
//! ordered by their preferences.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_path, ApiError};
use crate::adapters::http::middleware::{CurrentUser, OptionalUser};
use crate::adapters::http::state::AppState;
use crate::domain::board::{AnnouncementSearchParams, EventSearchParams};
use crate::domain::foundation::CampaignGuid;
use crate::domain::notification::NotificationSettings;

use super::dto::WindowQuery;

// ════════════════════════════════════════════════════════════════════════════════
// Board
// ════════════════════════════════════════════════════════════════════════════════

/// GET /public-board
pub async fn public_board(
    State(state): State<AppState>,
    Query(window): Query<WindowQuery>,
    OptionalUser(viewer): OptionalUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.board.board(window.for_viewer(viewer)).await?))
}

/// GET /public-board/events-search
pub async fn events_search(
    State(state): State<AppState>,
    Query(window): Query<WindowQuery>,
    Query(params): Query<EventSearchParams>,
    OptionalUser(viewer): OptionalUser,
) -> Result<impl IntoResponse, ApiError> {
    let events = state
        .board
        .search_events(window.for_viewer(viewer), &params)
        .await?;
    Ok(Json(events))
}

/// GET /public-board/announcements-search
pub async fn announcements_search(
    State(state): State<AppState>,
    Query(window): Query<WindowQuery>,
    Query(params): Query<AnnouncementSearchParams>,
    OptionalUser(viewer): OptionalUser,
) -> Result<impl IntoResponse, ApiError> {
    let announcements = state
        .board
        .search_announcements(window.for_viewer(viewer), &params)
        .await?;
    Ok(Json(announcements))
}

// ════════════════════════════════════════════════════════════════════════════════
// Notification subscriptions
// ════════════════════════════════════════════════════════════════════════════════

/// POST /public-board/subscribe-for-notifications/:campaign
pub async fn subscribe_for_notifications(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
    Json(settings): Json<NotificationSettings>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    state.subscriptions.subscribe(user, campaign, settings).await?;
    Ok(StatusCode::CREATED)
}

/// PUT /public-board/update-notification-settings/:campaign
pub async fn update_notification_settings(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
    Json(settings): Json<NotificationSettings>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    state
        .subscriptions
        .update_subscription(user, campaign, settings)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /public-board/unsubscribe-from-notifications/:campaign
pub async fn unsubscribe_from_notifications(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    state.subscriptions.unsubscribe(user, campaign).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /public-board/notification-settings
pub async fn notification_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.subscriptions.get_subscriptions_for_user(user).await?))
}
