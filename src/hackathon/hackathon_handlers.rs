use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use validator::Validate;

use super::{
    hackathon_dto::{CreateHackathonRequest, HackathonListQuery, UpdateParticipantNotificationsRequest},
    hackathon_models::{HackathonResponse, Participant},
};
use crate::{admin::AdminUser, error::Result, middleware::AuthUser, state::AppState};

/// List hackathons, optionally filtered by computed status
#[utoipa::path(
    get,
    path = "/api/hackathons",
    params(
        ("status" = Option<String>, Query, description = "upcoming, live or completed")
    ),
    responses(
        (status = 200, description = "Hackathons ordered by start date", body = Vec<HackathonResponse>)
    ),
    tag = "hackathons"
)]
pub async fn list_hackathons(
    State(state): State<AppState>,
    Query(query): Query<HackathonListQuery>,
) -> Result<Json<Vec<HackathonResponse>>> {
    let hackathons = state
        .hackathon_service
        .list(query.status, Utc::now())
        .await?;

    Ok(Json(hackathons))
}

/// Get a hackathon by slug
#[utoipa::path(
    get,
    path = "/api/hackathons/{slug}",
    params(("slug" = String, Path, description = "Hackathon slug")),
    responses(
        (status = 200, description = "Hackathon", body = HackathonResponse),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn get_hackathon(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<HackathonResponse>> {
    let hackathon = state
        .hackathon_service
        .get_by_slug(&slug, Utc::now())
        .await?;

    Ok(Json(hackathon))
}

/// Create a hackathon (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/hackathons",
    request_body = CreateHackathonRequest,
    responses(
        (status = 201, description = "Hackathon created", body = HackathonResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn create_hackathon(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreateHackathonRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let hackathon = state
        .hackathon_service
        .create(&admin, payload, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(hackathon)))
}

/// Enroll the caller in a hackathon
#[utoipa::path(
    post,
    path = "/api/hackathons/{slug}/join",
    params(("slug" = String, Path, description = "Hackathon slug")),
    responses(
        (status = 200, description = "Enrollment", body = Participant),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons",
    security(("bearer_auth" = []))
)]
pub async fn join_hackathon(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Participant>> {
    let participant = state.hackathon_service.join(&slug, &user_id).await?;
    Ok(Json(participant))
}

/// Enable or disable notifications for the caller's enrollment
#[utoipa::path(
    put,
    path = "/api/hackathons/{slug}/notifications",
    params(("slug" = String, Path, description = "Hackathon slug")),
    request_body = UpdateParticipantNotificationsRequest,
    responses(
        (status = 200, description = "Updated enrollment", body = Participant),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not participating")
    ),
    tag = "hackathons",
    security(("bearer_auth" = []))
)]
pub async fn update_participant_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateParticipantNotificationsRequest>,
) -> Result<Json<Participant>> {
    let participant = state
        .hackathon_service
        .set_notifications(&slug, &user_id, payload.notifications_enabled)
        .await?;

    Ok(Json(participant))
}
