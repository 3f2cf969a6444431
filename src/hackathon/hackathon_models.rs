use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a hackathon. Derived from its dates at read time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HackathonStatus {
    Upcoming,
    Live,
    Completed,
}

impl HackathonStatus {
    /// Both boundary instants count as live.
    pub fn at(start_date: DateTime<Utc>, end_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start_date {
            HackathonStatus::Upcoming
        } else if now <= end_date {
            HackathonStatus::Live
        } else {
            HackathonStatus::Completed
        }
    }
}

impl std::fmt::Display for HackathonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HackathonStatus::Upcoming => write!(f, "upcoming"),
            HackathonStatus::Live => write!(f, "live"),
            HackathonStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Hackathon {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location_type: String,
    pub has_voting: bool,
    pub voting_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hackathon {
    pub fn status_at(&self, now: DateTime<Utc>) -> HackathonStatus {
        HackathonStatus::at(self.start_date, self.end_date, now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub id: Uuid,
    pub hackathon_id: Uuid,
    pub user_id: String,
    pub role: String,
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HackathonResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location_type: String,
    pub has_voting: bool,
    pub voting_categories: Vec<String>,
    pub status: HackathonStatus,
    pub created_at: DateTime<Utc>,
}

impl HackathonResponse {
    pub fn at(hackathon: Hackathon, now: DateTime<Utc>) -> Self {
        let status = hackathon.status_at(now);
        Self {
            id: hackathon.id,
            slug: hackathon.slug,
            title: hackathon.title,
            description: hackathon.description,
            start_date: hackathon.start_date,
            end_date: hackathon.end_date,
            location_type: hackathon.location_type,
            has_voting: hackathon.has_voting,
            voting_categories: hackathon.voting_categories,
            status,
            created_at: hackathon.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 3, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_status_before_start_is_upcoming() {
        let now = start() - Duration::milliseconds(1);
        assert_eq!(HackathonStatus::at(start(), end(), now), HackathonStatus::Upcoming);
    }

    #[test]
    fn test_status_at_start_instant_is_live() {
        assert_eq!(HackathonStatus::at(start(), end(), start()), HackathonStatus::Live);
    }

    #[test]
    fn test_status_at_end_instant_is_live() {
        assert_eq!(HackathonStatus::at(start(), end(), end()), HackathonStatus::Live);
    }

    #[test]
    fn test_status_after_end_is_completed() {
        let now = end() + Duration::milliseconds(1);
        assert_eq!(HackathonStatus::at(start(), end(), now), HackathonStatus::Completed);
    }

    #[test]
    fn test_single_instant_hackathon() {
        assert_eq!(HackathonStatus::at(start(), start(), start()), HackathonStatus::Live);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(HackathonStatus::Upcoming.to_string(), "upcoming");
        assert_eq!(HackathonStatus::Live.to_string(), "live");
        assert_eq!(HackathonStatus::Completed.to_string(), "completed");
    }
}
