use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use super::{
    vote_dto::SubmitVoteRequest,
    vote_models::{SubmitVoteResponse, Vote, VoteCount},
};
use crate::{
    error::Result,
    middleware::{AuthUser, MaybeAuthUser},
    state::AppState,
};

/// Cast, move or withdraw the caller's vote in a category
#[utoipa::path(
    post,
    path = "/api/hackathons/{slug}/votes",
    params(("slug" = String, Path, description = "Hackathon slug")),
    request_body = SubmitVoteRequest,
    responses(
        (status = 200, description = "Vote toggled", body = SubmitVoteResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Authentication required to vote"),
        (status = 404, description = "Hackathon or participant not found")
    ),
    tag = "votes",
    security(("bearer_auth" = []))
)]
pub async fn submit_vote(
    State(state): State<AppState>,
    MaybeAuthUser(voter): MaybeAuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<SubmitVoteRequest>,
) -> Result<Json<SubmitVoteResponse>> {
    payload.validate()?;

    let response = state
        .vote_service
        .submit_vote(&slug, voter.as_deref(), payload)
        .await?;

    Ok(Json(response))
}

/// Vote tally per category and participant
#[utoipa::path(
    get,
    path = "/api/hackathons/{slug}/votes",
    params(("slug" = String, Path, description = "Hackathon slug")),
    responses(
        (status = 200, description = "Vote counts", body = Vec<VoteCount>),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "votes"
)]
pub async fn vote_counts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<VoteCount>>> {
    let counts = state.vote_service.vote_counts(&slug).await?;
    Ok(Json(counts))
}

/// The caller's votes in a hackathon
#[utoipa::path(
    get,
    path = "/api/hackathons/{slug}/votes/me",
    params(("slug" = String, Path, description = "Hackathon slug")),
    responses(
        (status = 200, description = "Caller's votes", body = Vec<Vote>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "votes",
    security(("bearer_auth" = []))
)]
pub async fn my_votes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Vote>>> {
    let votes = state.vote_service.my_votes(&slug, &user_id).await?;
    Ok(Json(votes))
}
