//! HTTP handlers for the caller's campaign preferences.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_path, ApiError};
use crate::adapters::http::middleware::CurrentUser;
use crate::adapters::http::state::AppState;
use crate::domain::foundation::CampaignGuid;

use super::dto::PreferenceRequest;

/// POST /preferences/add/:campaign
pub async fn add_preference(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<PreferenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    state
        .preferences
        .add_preference(user, campaign, request.is_preferred)
        .await?;
    Ok(StatusCode::CREATED)
}

/// PUT /preferences/update/:campaign
pub async fn update_preference(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<PreferenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    state
        .preferences
        .update_preference(user, campaign, request.is_preferred)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /preferences/remove/:campaign
pub async fn remove_preference(
    State(state): State<AppState>,
    Path(campaign): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let campaign: CampaignGuid = parse_path(&campaign, "campaign_guid")?;

    state.preferences.remove_preference(user, campaign).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /preferences/list
pub async fn list_preferences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.preferences.get_preferences(user).await?))
}
