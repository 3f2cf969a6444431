use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::mailing_list_models::MailingListPreferences;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubscribeRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    pub preferences: MailingListPreferences,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub preferences: MailingListPreferences,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenUnsubscribeRequest {
    pub token: String,
    /// base64url encoded email, as carried by the unsubscribe link
    pub email: String,
}
