//! HTTP handlers for publishing endpoints.
//!
//! Publishing and unpublishing need `publishing:edit` on the campaign;
//! member listings need `publishing:view`. General listings are public.
//! Personal events pass the campaign check and are then refused as
//! `INCORRECT_EVENT_TYPE` by the gateway.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_path, ApiError};
use crate::adapters::http::middleware::{CurrentUser, OptionalUser};
use crate::adapters::http::state::AppState;
use crate::domain::foundation::{
    AnnouncementGuid, CampaignGuid, EventGuid, Permission, PermissionTarget, UserId,
};
use crate::domain::publishing::PublishingError;

use super::dto::{PublishAnnouncementRequest, PublishedAnnouncementResponse, PublishedEventResponse};

const VIEW_PUBLISHING: Permission = Permission::view(PermissionTarget::Publishing);
const EDIT_PUBLISHING: Permission = Permission::edit(PermissionTarget::Publishing);

/// `publishing:edit` on the campaign, which must own the event. Personal
/// events only need the permission; the gateway refuses them afterwards.
async fn authorize_event_publishing(
    state: &AppState,
    user: UserId,
    event: EventGuid,
    campaign: CampaignGuid,
) -> Result<(), ApiError> {
    let auth = state.authorization(user);
    let details = state.events.get_event(event).await?;
    if details.event.is_campaign_event() {
        auth.require_in_campaign(&details.event, campaign, EDIT_PUBLISHING).await?;
    } else {
        auth.require(campaign, EDIT_PUBLISHING).await?;
    }
    Ok(())
}

/// POST /publishing/publish-event/:event/:campaign
pub async fn publish_event(
    State(state): State<AppState>,
    Path((event, campaign)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let event: EventGuid = parse_path(&event, "event_guid")?;
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    authorize_event_publishing(&state, user, event, campaign).await?;

    let published = state.publications.publish_event(event, user).await?;
    Ok((StatusCode::CREATED, Json(PublishedEventResponse::from(&published))))
}

/// POST /publishing/unpublish-event/:event/:campaign
pub async fn unpublish_event(
    State(state): State<AppState>,
    Path((event, campaign)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let event: EventGuid = parse_path(&event, "event_guid")?;
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    authorize_event_publishing(&state, user, event, campaign).await?;

    state.publications.unpublish_event(event).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /publishing/publish-announcement/:campaign
pub async fn publish_announcement(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<PublishAnnouncementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;
    state.authorization(user).require(campaign, EDIT_PUBLISHING).await?;

    let published = state
        .publications
        .publish_announcement(campaign, user, request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(PublishedAnnouncementResponse::from(&published))))
}

/// POST /publishing/unpublish-announcement/:announcement/:campaign
///
/// An announcement of another campaign is reported as not found.
pub async fn unpublish_announcement(
    State(state): State<AppState>,
    Path((announcement, campaign)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let announcement: AnnouncementGuid = parse_path(&announcement, "announcement_guid")?;
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;
    state.authorization(user).require(campaign, EDIT_PUBLISHING).await?;

    let in_campaign = state
        .publications
        .get_campaign_announcements(campaign)
        .await?
        .iter()
        .any(|item| item.announcement.guid == announcement);
    if !in_campaign {
        return Err(PublishingError::announcement_not_found(announcement).into());
    }

    state.publications.unpublish_announcement(announcement).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /publishing/campaign-published-events-campaign-member/:campaign
pub async fn campaign_published_events_campaign_member(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;
    state.authorization(user).require(campaign, VIEW_PUBLISHING).await?;

    let events = state.publications.get_campaign_published_events(campaign).await?;
    Ok(Json(
        events
            .iter()
            .map(PublishedEventResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /publishing/campaign-published-events-general/:campaign
pub async fn campaign_published_events_general(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    OptionalUser(_viewer): OptionalUser,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    let events = state
        .publications
        .get_campaign_published_events_public(campaign)
        .await?;
    Ok(Json(events))
}

/// GET /publishing/campaign-published-announcements-campaign-member/:campaign
pub async fn campaign_announcements_campaign_member(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;
    state.authorization(user).require(campaign, VIEW_PUBLISHING).await?;

    let announcements = state.publications.get_campaign_announcements(campaign).await?;
    Ok(Json(
        announcements
            .iter()
            .map(PublishedAnnouncementResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /publishing/campaign-published-announcements-general/:campaign
pub async fn campaign_announcements_general(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    let announcements = state
        .publications
        .get_campaign_announcements_public(campaign)
        .await?;
    Ok(Json(announcements))
}
