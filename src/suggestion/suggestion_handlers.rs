use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::{
    suggestion_dto::{CreateSuggestionRequest, SuggestionVoteRequest, UpdateSuggestionRequest},
    suggestion_models::{CommunitySuggestion, SuggestionVoteResponse},
};
use crate::{admin::AdminUser, error::Result, middleware::MaybeAuthUser, state::AppState};

/// List community suggestions, most voted first
#[utoipa::path(
    get,
    path = "/api/community-suggestions",
    responses(
        (status = 200, description = "Suggestions", body = Vec<CommunitySuggestion>)
    ),
    tag = "community"
)]
pub async fn list_suggestions(State(state): State<AppState>) -> Result<Json<Vec<CommunitySuggestion>>> {
    let suggestions = state.suggestion_service.list().await?;
    Ok(Json(suggestions))
}

/// Submit a suggestion as a signed-in user or a named guest
#[utoipa::path(
    post,
    path = "/api/community-suggestions",
    request_body = CreateSuggestionRequest,
    responses(
        (status = 201, description = "Suggestion created", body = CommunitySuggestion),
        (status = 400, description = "Missing fields or guest name")
    ),
    tag = "community"
)]
pub async fn create_suggestion(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Json(payload): Json<CreateSuggestionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let suggestion = state
        .suggestion_service
        .create(caller.as_deref(), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(suggestion)))
}

/// Edit a suggestion (admin only)
#[utoipa::path(
    patch,
    path = "/api/community-suggestions/{id}",
    params(("id" = Uuid, Path, description = "Suggestion ID")),
    request_body = UpdateSuggestionRequest,
    responses(
        (status = 200, description = "Updated suggestion", body = CommunitySuggestion),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Suggestion not found")
    ),
    tag = "community",
    security(("bearer_auth" = []))
)]
pub async fn update_suggestion(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSuggestionRequest>,
) -> Result<Json<CommunitySuggestion>> {
    payload.validate()?;

    let suggestion = state.suggestion_service.update(&admin, id, payload).await?;

    Ok(Json(suggestion))
}

/// Delete a suggestion (admin only)
#[utoipa::path(
    delete,
    path = "/api/community-suggestions/{id}",
    params(("id" = Uuid, Path, description = "Suggestion ID")),
    responses(
        (status = 204, description = "Suggestion deleted"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Suggestion not found")
    ),
    tag = "community",
    security(("bearer_auth" = []))
)]
pub async fn delete_suggestion(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.suggestion_service.delete(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the caller's vote on a suggestion
#[utoipa::path(
    post,
    path = "/api/community-suggestions/vote",
    request_body = SuggestionVoteRequest,
    responses(
        (status = 200, description = "Vote toggled", body = SuggestionVoteResponse),
        (status = 401, description = "Authentication required to vote"),
        (status = 404, description = "Suggestion not found")
    ),
    tag = "community",
    security(("bearer_auth" = []))
)]
pub async fn vote_suggestion(
    State(state): State<AppState>,
    MaybeAuthUser(voter): MaybeAuthUser,
    Json(payload): Json<SuggestionVoteRequest>,
) -> Result<Json<SuggestionVoteResponse>> {
    let response = state
        .suggestion_service
        .toggle_vote(voter.as_deref(), payload.suggestion_id)
        .await?;

    Ok(Json(response))
}
