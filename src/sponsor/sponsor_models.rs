use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SponsorApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl SponsorApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SponsorApprovalStatus::Pending => "pending",
            SponsorApprovalStatus::Approved => "approved",
            SponsorApprovalStatus::Rejected => "rejected",
        }
    }
}

impl TryFrom<String> for SponsorApprovalStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(SponsorApprovalStatus::Pending),
            "approved" => Ok(SponsorApprovalStatus::Approved),
            "rejected" => Ok(SponsorApprovalStatus::Rejected),
            other => Err(AppError::Validation(format!(
                "{} is not a sponsor approval status",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sponsor {
    pub id: Uuid,
    pub hackathon_id: Uuid,
    pub tier_id: Option<Uuid>,
    pub name: String,
    pub link: Option<String>,
    #[sqlx(try_from = "String")]
    pub approval_status: SponsorApprovalStatus,
    /// Admin who approved or rejected the application
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SponsorTier {
    pub id: Uuid,
    pub hackathon_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_round_trips_through_column_value() {
        for status in [
            SponsorApprovalStatus::Pending,
            SponsorApprovalStatus::Approved,
            SponsorApprovalStatus::Rejected,
        ] {
            let parsed = SponsorApprovalStatus::try_from(status.as_str().to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(SponsorApprovalStatus::try_from("Approved".to_string()).is_err());
    }
}
