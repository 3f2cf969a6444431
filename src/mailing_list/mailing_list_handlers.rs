use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::{
    mailing_list_dto::{SubscribeRequest, TokenUnsubscribeRequest, UpdatePreferencesRequest},
    mailing_list_models::{MailingListAck, Subscription, TokenUnsubscribeOutcome, UnsubscribeLink},
};
use crate::{
    admin::AdminUser,
    dto::{action_body, ActionResponse},
    error::{AppError, Result},
    middleware::MaybeAuthUser,
    state::AppState,
};

/// Get the caller's subscription (null for guests or when none exists)
#[utoipa::path(
    get,
    path = "/api/mailing-list/subscription",
    responses(
        (status = 200, description = "Action result wrapping the subscription or null")
    ),
    tag = "mailing-list"
)]
pub async fn get_subscription(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
) -> Json<ActionResponse<Option<Subscription>>> {
    let result = state
        .mailing_list_service
        .get_subscription(caller.as_deref())
        .await;

    Json(result.into())
}

/// Subscribe an email to the mailing list
#[utoipa::path(
    post,
    path = "/api/mailing-list/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Action result wrapping the subscription")
    ),
    tag = "mailing-list"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    payload: std::result::Result<Json<SubscribeRequest>, JsonRejection>,
) -> Json<ActionResponse<MailingListAck>> {
    let result = match action_body(payload) {
        Ok(payload) => match payload.validate() {
            Ok(()) => {
                state
                    .mailing_list_service
                    .subscribe(caller.as_deref(), payload)
                    .await
            }
            Err(e) => Err(e.into()),
        },
        Err(e) => Err(e),
    };

    Json(result.into())
}

/// Unsubscribe the caller
#[utoipa::path(
    post,
    path = "/api/mailing-list/unsubscribe",
    responses(
        (status = 200, description = "Action result wrapping the unsubscribed record")
    ),
    tag = "mailing-list",
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
) -> Json<ActionResponse<MailingListAck>> {
    let result = match caller {
        Some(user_id) => state.mailing_list_service.unsubscribe(&user_id).await,
        None => Err(AppError::Unauthorized("Not authenticated".to_string())),
    };

    Json(result.into())
}

/// Update the preferences of the caller's active subscription
#[utoipa::path(
    put,
    path = "/api/mailing-list/preferences",
    request_body = UpdatePreferencesRequest,
    responses(
        (status = 200, description = "Action result wrapping the updated record")
    ),
    tag = "mailing-list",
    security(("bearer_auth" = []))
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    payload: std::result::Result<Json<UpdatePreferencesRequest>, JsonRejection>,
) -> Json<ActionResponse<MailingListAck>> {
    let result = match action_body(payload) {
        Ok(payload) => {
            state
                .mailing_list_service
                .update_preferences(caller.as_deref(), payload.preferences)
                .await
        }
        Err(e) => Err(e),
    };

    Json(result.into())
}

/// Unsubscribe through an emailed link, no session needed
#[utoipa::path(
    post,
    path = "/api/mailing-list/unsubscribe-token",
    request_body = TokenUnsubscribeRequest,
    responses(
        (status = 200, description = "Action result of the link unsubscribe")
    ),
    tag = "mailing-list"
)]
pub async fn unsubscribe_with_token(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TokenUnsubscribeRequest>, JsonRejection>,
) -> Json<ActionResponse<TokenUnsubscribeOutcome>> {
    let result = match action_body(payload) {
        Ok(payload) => {
            state
                .mailing_list_service
                .unsubscribe_with_token(&payload.email, &payload.token, Utc::now())
                .await
        }
        Err(e) => Err(e),
    };

    Json(result.into())
}

/// List every mailing list subscription (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/mailing-list",
    responses(
        (status = 200, description = "All subscriptions, newest first", body = Vec<Subscription>),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<Vec<Subscription>>> {
    let subscriptions = state.mailing_list_service.list_subscriptions(&admin).await?;
    Ok(Json(subscriptions))
}

/// Delete a subscription (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/mailing-list/{id}",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 404, description = "Subscription not found")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn delete_subscription(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .mailing_list_service
        .delete_subscription(&admin, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Generate an unsubscribe link for a subscription (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/mailing-list/{id}/unsubscribe-link",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Signed unsubscribe link", body = UnsubscribeLink),
        (status = 404, description = "Subscription not found"),
        (status = 503, description = "Unsubscribe secret not configured")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe_link(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UnsubscribeLink>> {
    let link = state
        .mailing_list_service
        .unsubscribe_link(&admin, id, Utc::now())
        .await?;

    Ok(Json(link))
}
