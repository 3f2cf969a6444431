use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::{
    notification_dto::{RecentNotificationsQuery, SendNotificationRequest},
    notification_models::{DispatchReport, Notification},
};
use crate::{admin::AdminUser, error::Result, middleware::AuthUser, state::AppState};

/// Notifications of the hackathons the caller follows
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Caller's inbox, newest first", body = Vec<Notification>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state.notification_dispatcher.inbox(&user_id).await?;
    Ok(Json(notifications))
}

/// Broadcast a notification to a hackathon's participants (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    request_body = SendNotificationRequest,
    responses(
        (status = 201, description = "Notification recorded", body = DispatchReport),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn send_notification(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<SendNotificationRequest>,
) -> Result<(StatusCode, Json<DispatchReport>)> {
    payload.validate()?;

    let report = state.notification_dispatcher.send(&admin, payload).await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// Recently sent notifications (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/notifications",
    params(RecentNotificationsQuery),
    responses(
        (status = 200, description = "Newest first", body = Vec<Notification>),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn recent_notifications(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(query): Query<RecentNotificationsQuery>,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state
        .notification_dispatcher
        .recent(&admin, query.limit)
        .await?;

    Ok(Json(notifications))
}
