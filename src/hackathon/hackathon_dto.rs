use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::hackathon_models::HackathonStatus;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHackathonRequest {
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location_type: Option<String>,
    #[serde(default)]
    pub has_voting: bool,
    #[serde(default)]
    pub voting_categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HackathonListQuery {
    pub status: Option<HackathonStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateParticipantNotificationsRequest {
    pub notifications_enabled: bool,
}
