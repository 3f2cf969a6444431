use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vote {
    pub id: Uuid,
    pub hackathon_id: Uuid,
    pub category: String,
    pub voter_id: String,
    pub participant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a toggle did to the voter's single vote in a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteOutcome {
    Cast,
    Changed,
    Withdrawn,
}

impl VoteOutcome {
    pub fn has_voted(self) -> bool {
        !matches!(self, VoteOutcome::Withdrawn)
    }

    pub fn message(self) -> &'static str {
        match self {
            VoteOutcome::Cast => "Vote submitted successfully",
            VoteOutcome::Changed => "Vote updated successfully",
            VoteOutcome::Withdrawn => "Vote removed successfully",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VoteCount {
    pub category: String,
    pub participant_id: Uuid,
    pub votes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitVoteResponse {
    pub message: String,
    pub has_voted: bool,
    pub vote_count: i64,
    pub outcome: VoteOutcome,
}
