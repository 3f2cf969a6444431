use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::sponsor_models::SponsorApprovalStatus;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SponsorApplicationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(url)]
    pub link: Option<String>,
    pub tier_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectSponsorRequest {
    #[validate(length(max = 1000))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSponsorTierRequest {
    pub hackathon_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SponsorListQuery {
    pub status: Option<SponsorApprovalStatus>,
}
