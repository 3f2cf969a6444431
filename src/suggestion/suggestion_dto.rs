use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSuggestionRequest {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(length(max = 100))]
    pub category: String,
    /// Display name. Required when posting without a session.
    #[validate(length(max = 100))]
    pub guest_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSuggestionRequest {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(length(max = 100))]
    pub category: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SuggestionVoteRequest {
    pub suggestion_id: Uuid,
}
