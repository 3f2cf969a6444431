use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MailingListPreferences {
    pub marketing: bool,
    pub updates: bool,
}

impl Default for MailingListPreferences {
    fn default() -> Self {
        Self {
            marketing: true,
            updates: true,
        }
    }
}

/// One row per email. `unsubscribed_at` being null means the subscription is active.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub email: String,
    pub name: Option<String>,
    #[sqlx(flatten)]
    pub preferences: MailingListPreferences,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.unsubscribed_at.is_none()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MailingListAck {
    pub subscription: Subscription,
    pub email_service_available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenUnsubscribeOutcome {
    pub email: String,
    pub participations_muted: u64,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnsubscribeLink {
    pub email: String,
    pub link: String,
}
