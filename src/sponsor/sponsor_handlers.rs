use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::{
    sponsor_dto::{
        CreateSponsorTierRequest, RejectSponsorRequest, SponsorApplicationRequest,
        SponsorListQuery,
    },
    sponsor_models::{Sponsor, SponsorTier},
};
use crate::{admin::AdminUser, error::Result, middleware::AuthUser, state::AppState};

/// Apply to sponsor a hackathon
#[utoipa::path(
    post,
    path = "/api/hackathons/{slug}/sponsors",
    params(("slug" = String, Path, description = "Hackathon slug")),
    request_body = SponsorApplicationRequest,
    responses(
        (status = 201, description = "Pending application", body = Sponsor),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon or tier not found")
    ),
    tag = "sponsors",
    security(("bearer_auth" = []))
)]
pub async fn apply_to_sponsor(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<SponsorApplicationRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let sponsor = state
        .sponsor_service
        .apply(&slug, &user_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(sponsor)))
}

/// Approved sponsors of a hackathon
#[utoipa::path(
    get,
    path = "/api/hackathons/{slug}/sponsors",
    params(("slug" = String, Path, description = "Hackathon slug")),
    responses(
        (status = 200, description = "Approved sponsors", body = Vec<Sponsor>),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "sponsors"
)]
pub async fn list_hackathon_sponsors(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Sponsor>>> {
    let sponsors = state.sponsor_service.approved_sponsors(&slug).await?;
    Ok(Json(sponsors))
}

/// Sponsor tiers of a hackathon
#[utoipa::path(
    get,
    path = "/api/hackathons/{slug}/sponsor-tiers",
    params(("slug" = String, Path, description = "Hackathon slug")),
    responses(
        (status = 200, description = "Sponsor tiers", body = Vec<SponsorTier>),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "sponsors"
)]
pub async fn list_sponsor_tiers(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<SponsorTier>>> {
    let tiers = state.sponsor_service.tiers(&slug).await?;
    Ok(Json(tiers))
}

/// List sponsor applications (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/sponsors",
    params(SponsorListQuery),
    responses(
        (status = 200, description = "Applications, newest first", body = Vec<Sponsor>),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn list_sponsors(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(query): Query<SponsorListQuery>,
) -> Result<Json<Vec<Sponsor>>> {
    let sponsors = state.sponsor_service.list(&admin, query.status).await?;
    Ok(Json(sponsors))
}

/// Approve a sponsor application (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/sponsors/{id}/approve",
    params(("id" = Uuid, Path, description = "Sponsor ID")),
    responses(
        (status = 200, description = "Approved sponsor", body = Sponsor),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Sponsor not found")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn approve_sponsor(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Sponsor>> {
    let sponsor = state
        .sponsor_service
        .approve(&admin, id, Utc::now())
        .await?;

    Ok(Json(sponsor))
}

/// Reject a sponsor application (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/sponsors/{id}/reject",
    params(("id" = Uuid, Path, description = "Sponsor ID")),
    request_body = RejectSponsorRequest,
    responses(
        (status = 200, description = "Rejected sponsor", body = Sponsor),
        (status = 400, description = "Rejection reason missing"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Sponsor not found")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn reject_sponsor(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectSponsorRequest>,
) -> Result<Json<Sponsor>> {
    payload.validate()?;

    let sponsor = state
        .sponsor_service
        .reject(&admin, id, &payload.reason, Utc::now())
        .await?;

    Ok(Json(sponsor))
}

/// Add a sponsor tier to a hackathon (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/sponsor-tiers",
    request_body = CreateSponsorTierRequest,
    responses(
        (status = 201, description = "Tier created", body = SponsorTier),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn create_sponsor_tier(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreateSponsorTierRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let tier = state.sponsor_service.create_tier(&admin, payload).await?;

    Ok((StatusCode::CREATED, Json(tier)))
}
