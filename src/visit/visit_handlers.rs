use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap},
    Json,
};
use chrono::Utc;
use validator::Validate;

use super::{
    visit_dto::{TrackVisitRequest, VisitSummaryQuery},
    visit_models::{TrackOutcome, VisitSummary},
};
use crate::{
    admin::AdminUser,
    dto::{action_body, ActionResponse},
    error::Result,
    middleware::MaybeAuthUser,
    state::AppState,
};

/// Record a page view
#[utoipa::path(
    post,
    path = "/api/visits",
    request_body = TrackVisitRequest,
    responses(
        (status = 200, description = "Action result; recorded is false for filtered visits")
    ),
    tag = "analytics"
)]
pub async fn track_visit(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    headers: HeaderMap,
    payload: std::result::Result<Json<TrackVisitRequest>, JsonRejection>,
) -> Json<ActionResponse<TrackOutcome>> {
    let header_value = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

    let result = match action_body(payload) {
        Ok(payload) => match payload.validate() {
            Ok(()) => {
                state
                    .visit_tracker
                    .track(
                        caller.as_deref(),
                        &payload.path,
                        header_value(header::USER_AGENT),
                        header_value(header::REFERER),
                        Utc::now(),
                    )
                    .await
            }
            Err(e) => Err(e.into()),
        },
        Err(e) => Err(e),
    };

    Json(result.into())
}

/// Visit totals and the latest visits for a window of days (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/visits",
    params(VisitSummaryQuery),
    responses(
        (status = 200, description = "Visit summary", body = VisitSummary),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn visit_summary(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(query): Query<VisitSummaryQuery>,
) -> Result<Json<VisitSummary>> {
    let summary = state
        .visit_tracker
        .summary(&admin, query.days, Utc::now())
        .await?;

    Ok(Json(summary))
}
