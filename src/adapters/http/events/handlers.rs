//! HTTP handlers for event endpoints.
//!
//! Each handler authorizes first, then calls the `EventRegistry`:
//!
//! - personal events: creator only, except self-removal and self-join of
//!   open-join events
//! - campaign events: `events:edit` on the campaign, and the event must
//!   belong to that campaign

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_path, ApiError};
use crate::adapters::http::middleware::CurrentUser;
use crate::adapters::http::state::AppState;
use crate::application::AuthorizationContext;
use crate::domain::directory::UserContact;
use crate::domain::event::{EventDetails, EventError, EventOwner, ParticipantRef};
use crate::domain::foundation::{CampaignGuid, EventGuid, Permission, PermissionTarget};
use crate::domain::notification::NotifyOptions;

use super::dto::{
    CreateEventRequest, CreatedEventResponse, EventDetailsResponse, EventResponse,
    MembershipResponse, RemovedResponse, UpdateEventRequest, UserEventResponse,
};

const VIEW_EVENTS: Permission = Permission::view(PermissionTarget::Events);
const EDIT_EVENTS: Permission = Permission::edit(PermissionTarget::Events);

// ════════════════════════════════════════════════════════════════════════════════
// Access helpers
// ════════════════════════════════════════════════════════════════════════════════

/// Loads a personal event. Campaign events are refused on personal routes.
async fn personal_event(state: &AppState, event: &str) -> Result<EventDetails, ApiError> {
    let guid: EventGuid = parse_path(event, "event_guid")?;
    let details = state.events.get_event(guid).await?;
    if details.event.is_campaign_event() {
        return Err(EventError::incorrect_event_type(guid).into());
    }
    Ok(details)
}

/// Loads the event, then checks the campaign permission and that the event
/// belongs to the campaign.
async fn campaign_event(
    state: &AppState,
    auth: &AuthorizationContext,
    campaign: &str,
    event: &str,
    permission: Permission,
) -> Result<EventDetails, ApiError> {
    let campaign: CampaignGuid = parse_path(campaign, "campaign_guid")?;
    let guid: EventGuid = parse_path(event, "event_guid")?;

    let details = state.events.get_event(guid).await?;
    auth.require_in_campaign(&details.event, campaign, permission).await?;
    Ok(details)
}

async fn resolve_email(state: &AppState, email: String) -> Result<(ParticipantRef, UserContact), ApiError> {
    let who = ParticipantRef::Email(email);
    let contact = state.events.resolve_participant(&who).await?;
    Ok((who, contact))
}

// ════════════════════════════════════════════════════════════════════════════════
// Create / update / delete
// ════════════════════════════════════════════════════════════════════════════════

/// POST /events/create-personal-event
pub async fn create_personal_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .events
        .create_event(request.into_new_event(user, EventOwner::Personal(user)))
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedEventResponse::from(created))))
}

/// POST /events/create-campaign-event/:campaign
pub async fn create_campaign_event(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;
    state.authorization(user).require(campaign, EDIT_EVENTS).await?;

    let created = state
        .events
        .create_event(request.into_new_event(user, EventOwner::Campaign(campaign)))
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedEventResponse::from(created))))
}

/// PATCH /events/update-personal-event/:event
pub async fn update_personal_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let details = personal_event(&state, &event).await?;
    state.authorization(user).require_creator(&details.event)?;

    let (patch, notify) = request.into_patch();
    let updated = state.events.update_event(details.event.guid, patch, notify).await?;

    Ok(Json(EventResponse::from(&updated)))
}

/// PATCH /events/update-campaign-event/:campaign/:event
pub async fn update_campaign_event(
    State(state): State<AppState>,
    Path((campaign, event)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state.authorization(user);
    let details = campaign_event(&state, &auth, &campaign, &event, EDIT_EVENTS).await?;

    let (patch, notify) = request.into_patch();
    if let Some(target) = patch.campaign {
        auth.require(target, EDIT_EVENTS).await?;
    }
    let updated = state.events.update_event(details.event.guid, patch, notify).await?;

    Ok(Json(EventResponse::from(&updated)))
}

/// DELETE /events/delete-personal-event/:event
pub async fn delete_personal_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
    Query(notify): Query<NotifyOptions>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let details = personal_event(&state, &event).await?;
    state.authorization(user).require_creator(&details.event)?;

    state.events.delete_event(details.event.guid, notify).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /events/delete-campaign-event/:campaign/:event
pub async fn delete_campaign_event(
    State(state): State<AppState>,
    Path((campaign, event)): Path<(String, String)>,
    Query(notify): Query<NotifyOptions>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state.authorization(user);
    let details = campaign_event(&state, &auth, &campaign, &event, EDIT_EVENTS).await?;

    state.events.delete_event(details.event.guid, notify).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Participants and watchers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /events/add-personal-or-open-event-participant/:event/:email
///
/// The creator may add anyone; other users may add themselves when the
/// event is open-join.
pub async fn add_personal_or_open_event_participant(
    State(state): State<AppState>,
    Path((event, email)): Path<(String, String)>,
    Query(notify): Query<NotifyOptions>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let guid: EventGuid = parse_path(&event, "event_guid")?;
    let details = state.events.get_event(guid).await?;
    let (who, target) = resolve_email(&state, email).await?;
    state
        .authorization(user)
        .require_can_add_participant(&details.event, target.user_id)?;

    let transition = state.events.add_participant(guid, who, notify).await?;
    Ok((StatusCode::CREATED, Json(MembershipResponse::from(transition))))
}

/// POST /events/add-campaign-event-participant/:campaign/:event/:email
pub async fn add_campaign_event_participant(
    State(state): State<AppState>,
    Path((campaign, event, email)): Path<(String, String, String)>,
    Query(notify): Query<NotifyOptions>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state.authorization(user);
    let details = campaign_event(&state, &auth, &campaign, &event, EDIT_EVENTS).await?;

    let transition = state
        .events
        .add_participant(details.event.guid, ParticipantRef::Email(email), notify)
        .await?;
    Ok((StatusCode::CREATED, Json(MembershipResponse::from(transition))))
}

/// DELETE /events/remove-event-participant-personal-event/:event/:email
///
/// Also how any member leaves an event: removing yourself needs no other
/// right.
pub async fn remove_event_participant_personal_event(
    State(state): State<AppState>,
    Path((event, email)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let guid: EventGuid = parse_path(&event, "event_guid")?;
    let details = state.events.get_event(guid).await?;
    let (who, target) = resolve_email(&state, email).await?;
    state
        .authorization(user)
        .require_can_remove_participant(&details.event, target.user_id)?;

    let removed = state.events.remove_participant(guid, who).await?;
    Ok(Json(RemovedResponse { removed }))
}

/// DELETE /events/remove-event-participant-campaign-event/:campaign/:event/:email
pub async fn remove_event_participant_campaign_event(
    State(state): State<AppState>,
    Path((campaign, event, email)): Path<(String, String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state.authorization(user);
    let details = campaign_event(&state, &auth, &campaign, &event, EDIT_EVENTS).await?;

    let removed = state
        .events
        .remove_participant(details.event.guid, ParticipantRef::Email(email))
        .await?;
    Ok(Json(RemovedResponse { removed }))
}

/// POST /events/add-event-watcher/:event
pub async fn add_event_watcher(
    State(state): State<AppState>,
    Path(event): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let guid: EventGuid = parse_path(&event, "event_guid")?;

    let transition = state.events.add_watcher(guid, user).await?;
    Ok((StatusCode::CREATED, Json(MembershipResponse::from(transition))))
}

/// DELETE /events/remove-event-watcher/:event
pub async fn remove_event_watcher(
    State(state): State<AppState>,
    Path(event): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let guid: EventGuid = parse_path(&event, "event_guid")?;

    let removed = state.events.remove_watcher(guid, user).await?;
    Ok(Json(RemovedResponse { removed }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Queries
// ════════════════════════════════════════════════════════════════════════════════

/// GET /events/get-event/:event
pub async fn get_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
    CurrentUser(_user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let guid: EventGuid = parse_path(&event, "event_guid")?;

    let details = state.events.get_event(guid).await?;
    Ok(Json(EventDetailsResponse::from(&details)))
}

/// GET /events/get-event-participants-personal-event/:event
pub async fn get_event_participants_personal_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let details = personal_event(&state, &event).await?;
    state.authorization(user).require_creator(&details.event)?;

    let participants = state.events.get_participants(details.event.guid).await?;
    Ok(Json(participants))
}

/// GET /events/get-event-participants-campaign-event/:campaign/:event
pub async fn get_event_participants_campaign_event(
    State(state): State<AppState>,
    Path((campaign, event)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state.authorization(user);
    let details = campaign_event(&state, &auth, &campaign, &event, VIEW_EVENTS).await?;

    let participants = state.events.get_participants(details.event.guid).await?;
    Ok(Json(participants))
}

/// GET /events/get-campaign-events/:campaign
pub async fn get_campaign_events(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;
    state.authorization(user).require(campaign, VIEW_EVENTS).await?;

    let events = state.events.get_campaign_events(campaign).await?;
    Ok(Json(
        events
            .iter()
            .map(EventDetailsResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /events/get-personal-events
pub async fn get_personal_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.events.get_personal_events(user).await?;
    Ok(Json(events.iter().map(EventResponse::from).collect::<Vec<_>>()))
}

/// GET /events/get-self-events
pub async fn get_self_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.events.get_user_events(user).await?;
    Ok(Json(
        events
            .iter()
            .map(UserEventResponse::from)
            .collect::<Vec<_>>(),
    ))
}
