use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::notification_templates::NotificationTemplate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    pub hackathon_id: Uuid,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub message: Option<String>,
    /// Renders title and message from the hackathon; explicit fields win
    pub template: Option<NotificationTemplate>,
    pub voting_duration_hours: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentNotificationsQuery {
    pub limit: Option<i64>,
}
