use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitVoteRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub participant_id: Uuid,
}
