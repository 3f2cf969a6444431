use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{
    hackathon_dto::CreateHackathonRequest,
    hackathon_models::{Hackathon, HackathonResponse, HackathonStatus, Participant},
    hackathon_repository::{HackathonRepository, NewHackathon},
};
use crate::{
    admin::AdminUser,
    error::{AppError, Result},
};

#[derive(Clone)]
pub struct HackathonService {
    repo: Arc<dyn HackathonRepository>,
}

impl HackathonService {
    pub fn new(repo: Arc<dyn HackathonRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        status: Option<HackathonStatus>,
        now: DateTime<Utc>,
    ) -> Result<Vec<HackathonResponse>> {
        let hackathons = self.repo.list_all().await?;

        Ok(hackathons
            .into_iter()
            .map(|h| HackathonResponse::at(h, now))
            .filter(|h| status.map_or(true, |wanted| h.status == wanted))
            .collect())
    }

    pub async fn get_by_slug(&self, slug: &str, now: DateTime<Utc>) -> Result<HackathonResponse> {
        let hackathon = self.find_by_slug(slug).await?;
        Ok(HackathonResponse::at(hackathon, now))
    }

    pub async fn create(
        &self,
        admin: &AdminUser,
        payload: CreateHackathonRequest,
        now: DateTime<Utc>,
    ) -> Result<HackathonResponse> {
        let slug = payload.slug.trim().to_lowercase();
        if !is_valid_slug(&slug) {
            return Err(AppError::Validation(
                "Slug may only contain lowercase letters, digits and dashes".to_string(),
            ));
        }
        if payload.end_date < payload.start_date {
            return Err(AppError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }

        let voting_categories: Vec<String> = payload
            .voting_categories
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let new = NewHackathon {
            slug,
            title: payload.title.trim().to_string(),
            description: payload.description,
            start_date: payload.start_date,
            end_date: payload.end_date,
            location_type: payload.location_type.unwrap_or_else(|| "virtual".to_string()),
            has_voting: payload.has_voting,
            voting_categories,
        };

        let hackathon = self.repo.create(&new).await?;
        tracing::info!("Admin {} created hackathon {}", admin.id(), hackathon.slug);

        Ok(HackathonResponse::at(hackathon, now))
    }

    pub async fn join(&self, slug: &str, user_id: &str) -> Result<Participant> {
        let hackathon = self.find_by_slug(slug).await?;
        let participant = self.repo.join(hackathon.id, user_id).await?;
        tracing::info!("User {} joined hackathon {}", user_id, hackathon.slug);
        Ok(participant)
    }

    pub async fn set_notifications(
        &self,
        slug: &str,
        user_id: &str,
        enabled: bool,
    ) -> Result<Participant> {
        let hackathon = self.find_by_slug(slug).await?;
        self.repo
            .set_notifications(hackathon.id, user_id, enabled)
            .await?
            .ok_or_else(|| AppError::NotFound("You are not participating in this hackathon".into()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Hackathon> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Hackathon not found".into()))
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hackathon::hackathon_repository::MemoryHackathonRepository;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    fn request(slug: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CreateHackathonRequest {
        CreateHackathonRequest {
            slug: slug.to_string(),
            title: format!("{} hackathon", slug),
            description: None,
            start_date: start,
            end_date: end,
            location_type: None,
            has_voting: true,
            voting_categories: vec!["Best Overall".to_string(), "  ".to_string()],
        }
    }

    fn service() -> HackathonService {
        HackathonService::new(Arc::new(MemoryHackathonRepository::new()))
    }

    #[tokio::test]
    async fn test_list_filters_by_computed_status() {
        let service = service();
        let admin = AdminUser::for_tests("user_1");
        service
            .create(&admin, request("past", now() - Duration::days(10), now() - Duration::days(9)), now())
            .await
            .unwrap();
        service
            .create(&admin, request("current", now() - Duration::hours(1), now() + Duration::hours(1)), now())
            .await
            .unwrap();
        service
            .create(&admin, request("future", now() + Duration::days(9), now() + Duration::days(10)), now())
            .await
            .unwrap();

        let live = service.list(Some(HackathonStatus::Live), now()).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].slug, "current");

        let all = service.list(None, now()).await.unwrap();
        let slugs: Vec<&str> = all.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["past", "current", "future"]);
    }

    #[tokio::test]
    async fn test_status_changes_without_writes() {
        let service = service();
        let admin = AdminUser::for_tests("user_1");
        let created = service
            .create(&admin, request("spring", now() + Duration::hours(1), now() + Duration::hours(2)), now())
            .await
            .unwrap();
        assert_eq!(created.status, HackathonStatus::Upcoming);
        assert_eq!(created.voting_categories, vec!["Best Overall".to_string()]);

        let later = service
            .get_by_slug("spring", now() + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(later.status, HackathonStatus::Live);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let service = service();
        let admin = AdminUser::for_tests("user_1");

        let bad_slug = service
            .create(&admin, request("Not A Slug!", now(), now()), now())
            .await;
        assert!(matches!(bad_slug, Err(AppError::Validation(_))));

        let bad_dates = service
            .create(&admin, request("reversed", now(), now() - Duration::hours(1)), now())
            .await;
        assert!(matches!(bad_dates, Err(AppError::Validation(_))));

        service
            .create(&admin, request("taken", now(), now()), now())
            .await
            .unwrap();
        let duplicate = service
            .create(&admin, request("taken", now(), now()), now())
            .await;
        assert!(matches!(duplicate, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_join_is_idempotent_and_notifications_toggle() {
        let service = service();
        let admin = AdminUser::for_tests("user_1");
        service
            .create(&admin, request("spring", now(), now() + Duration::days(1)), now())
            .await
            .unwrap();

        let first = service.join("spring", "user_2").await.unwrap();
        let second = service.join("spring", "user_2").await.unwrap();
        assert_eq!(first.id, second.id);
        assert!(first.notifications_enabled);

        let muted = service.set_notifications("spring", "user_2", false).await.unwrap();
        assert!(!muted.notifications_enabled);

        let stranger = service.set_notifications("spring", "user_3", false).await;
        assert!(matches!(stranger, Err(AppError::NotFound(_))));

        let missing = service.join("winter", "user_2").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
