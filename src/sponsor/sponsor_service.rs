use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    sponsor_dto::{CreateSponsorTierRequest, SponsorApplicationRequest},
    sponsor_models::{Sponsor, SponsorApprovalStatus, SponsorTier},
    sponsor_repository::{NewSponsor, NewSponsorTier, SponsorDecision, SponsorRepository},
};
use crate::{
    admin::AdminUser,
    cache::{hackathon_page, PageCache, ADMIN_SPONSORS_PAGE},
    error::{AppError, Result},
    hackathon::{hackathon_repository::HackathonRepository, Hackathon},
};

#[derive(Clone)]
pub struct SponsorService {
    sponsors: Arc<dyn SponsorRepository>,
    hackathons: Arc<dyn HackathonRepository>,
    cache: PageCache,
}

impl SponsorService {
    pub fn new(
        sponsors: Arc<dyn SponsorRepository>,
        hackathons: Arc<dyn HackathonRepository>,
        cache: PageCache,
    ) -> Self {
        Self {
            sponsors,
            hackathons,
            cache,
        }
    }

    pub async fn apply(
        &self,
        slug: &str,
        user_id: &str,
        payload: SponsorApplicationRequest,
    ) -> Result<Sponsor> {
        let hackathon = self.find_hackathon(slug).await?;

        let name = payload.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Sponsor name is required".to_string()));
        }

        if let Some(tier_id) = payload.tier_id {
            let tier = self.sponsors.find_tier(tier_id).await?;
            if tier.map_or(true, |t| t.hackathon_id != hackathon.id) {
                return Err(AppError::NotFound("Sponsor tier not found".to_string()));
            }
        }

        let sponsor = self
            .sponsors
            .create(&NewSponsor {
                hackathon_id: hackathon.id,
                tier_id: payload.tier_id,
                name,
                link: payload.link,
            })
            .await?;

        self.cache.revalidate(ADMIN_SPONSORS_PAGE);
        tracing::info!(
            "User {} applied to sponsor {} as {}",
            user_id,
            slug,
            sponsor.name
        );

        Ok(sponsor)
    }

    pub async fn approved_sponsors(&self, slug: &str) -> Result<Vec<Sponsor>> {
        let hackathon = self.find_hackathon(slug).await?;
        self.sponsors
            .list(Some(hackathon.id), Some(SponsorApprovalStatus::Approved))
            .await
    }

    pub async fn tiers(&self, slug: &str) -> Result<Vec<SponsorTier>> {
        let hackathon = self.find_hackathon(slug).await?;
        self.sponsors.list_tiers(hackathon.id).await
    }

    /// All applications, optionally filtered. The unfiltered list backs the
    /// admin sponsors page and is cached until the next sponsor write.
    pub async fn list(
        &self,
        _admin: &AdminUser,
        status: Option<SponsorApprovalStatus>,
    ) -> Result<Vec<Sponsor>> {
        let all = match self
            .cache
            .get(ADMIN_SPONSORS_PAGE)
            .and_then(|page| serde_json::from_value::<Vec<Sponsor>>(page).ok())
        {
            Some(cached) => cached,
            None => {
                let generation = self.cache.generation(ADMIN_SPONSORS_PAGE);
                let fresh = self.sponsors.list(None, None).await?;
                match serde_json::to_value(&fresh) {
                    Ok(page) => {
                        self.cache.put_if_current(ADMIN_SPONSORS_PAGE, generation, page);
                    }
                    Err(e) => tracing::warn!("Could not cache sponsors page: {:?}", e),
                }
                fresh
            }
        };

        Ok(match status {
            Some(status) => all
                .into_iter()
                .filter(|s| s.approval_status == status)
                .collect(),
            None => all,
        })
    }

    pub async fn approve(&self, admin: &AdminUser, id: Uuid, now: DateTime<Utc>) -> Result<Sponsor> {
        let decision = SponsorDecision {
            status: SponsorApprovalStatus::Approved,
            decided_by: admin.id().to_string(),
            decided_at: now,
            rejection_reason: None,
        };

        self.decide(id, &decision).await
    }

    pub async fn reject(
        &self,
        admin: &AdminUser,
        id: Uuid,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Sponsor> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A rejection reason is required".to_string()));
        }

        let decision = SponsorDecision {
            status: SponsorApprovalStatus::Rejected,
            decided_by: admin.id().to_string(),
            decided_at: now,
            rejection_reason: Some(reason.to_string()),
        };

        self.decide(id, &decision).await
    }

    pub async fn create_tier(
        &self,
        admin: &AdminUser,
        payload: CreateSponsorTierRequest,
    ) -> Result<SponsorTier> {
        let hackathon = self
            .hackathons
            .find_by_id(payload.hackathon_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hackathon not found".to_string()))?;

        let tier = self
            .sponsors
            .create_tier(&NewSponsorTier {
                hackathon_id: hackathon.id,
                name: payload.name.trim().to_string(),
                description: payload.description,
            })
            .await?;

        self.cache.revalidate(&hackathon_page(&hackathon.slug));
        tracing::info!("Admin {} added sponsor tier {} to {}", admin.id(), tier.name, hackathon.slug);

        Ok(tier)
    }

    async fn decide(&self, id: Uuid, decision: &SponsorDecision) -> Result<Sponsor> {
        let sponsor = self
            .sponsors
            .set_decision(id, decision)
            .await?
            .ok_or_else(|| AppError::NotFound("Sponsor not found".to_string()))?;

        self.cache.revalidate(ADMIN_SPONSORS_PAGE);
        if let Some(hackathon) = self.hackathons.find_by_id(sponsor.hackathon_id).await? {
            self.cache.revalidate(&hackathon_page(&hackathon.slug));
        }

        tracing::info!(
            "Sponsor {} marked {} by {}",
            sponsor.id,
            decision.status.as_str(),
            decision.decided_by
        );

        Ok(sponsor)
    }

    async fn find_hackathon(&self, slug: &str) -> Result<Hackathon> {
        self.hackathons
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Hackathon not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        admin::AdminPolicy,
        hackathon::hackathon_repository::{MemoryHackathonRepository, NewHackathon},
        sponsor::sponsor_repository::MemorySponsorRepository,
        state::Environment,
    };

    async fn setup() -> (SponsorService, PageCache) {
        let hackathons = Arc::new(MemoryHackathonRepository::new());
        let now = Utc::now();
        hackathons
            .create(&NewHackathon {
                slug: "spring".to_string(),
                title: "Spring".to_string(),
                description: None,
                start_date: now,
                end_date: now,
                location_type: "virtual".to_string(),
                has_voting: false,
                voting_categories: vec![],
            })
            .await
            .unwrap();

        let cache = PageCache::new();
        let service = SponsorService::new(
            Arc::new(MemorySponsorRepository::new()),
            hackathons,
            cache.clone(),
        );
        (service, cache)
    }

    fn application(name: &str) -> SponsorApplicationRequest {
        SponsorApplicationRequest {
            name: name.to_string(),
            link: Some("https://acme.dev".to_string()),
            tier_id: None,
        }
    }

    #[tokio::test]
    async fn test_admin_approves_pending_sponsor() {
        let (service, _) = setup().await;
        let policy = AdminPolicy::from_csv("user_1");
        let now = Utc::now();

        let sponsor = service
            .apply("spring", "user_5", application("Acme"))
            .await
            .unwrap();
        assert_eq!(sponsor.approval_status, SponsorApprovalStatus::Pending);

        let admin = policy.authorize("user_1", Environment::Production).unwrap();
        let approved = service.approve(&admin, sponsor.id, now).await.unwrap();

        assert_eq!(approved.approval_status, SponsorApprovalStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("user_1"));
        assert_eq!(approved.approved_at, Some(now));
        assert_eq!(service.approved_sponsors("spring").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_approve_and_nothing_changes() {
        let (service, _) = setup().await;
        let policy = AdminPolicy::from_csv("user_1");
        let sponsor = service
            .apply("spring", "user_5", application("Acme"))
            .await
            .unwrap();

        let denied = policy.authorize("user_5", Environment::Production);
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        let admin = AdminUser::for_tests("user_1");
        let listed = service.list(&admin, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, sponsor.id);
        assert_eq!(listed[0].approval_status, SponsorApprovalStatus::Pending);
        assert!(listed[0].approved_by.is_none());
        assert!(listed[0].approved_at.is_none());
    }

    #[tokio::test]
    async fn test_reject_requires_reason_and_records_it() {
        let (service, _) = setup().await;
        let admin = AdminUser::for_tests("user_1");
        let sponsor = service
            .apply("spring", "user_5", application("Acme"))
            .await
            .unwrap();

        let blank = service.reject(&admin, sponsor.id, "  ", Utc::now()).await;
        assert!(matches!(blank, Err(AppError::Validation(_))));

        let rejected = service
            .reject(&admin, sponsor.id, "Not a fit", Utc::now())
            .await
            .unwrap();
        assert_eq!(rejected.approval_status, SponsorApprovalStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Not a fit"));
        assert_eq!(rejected.approved_by.as_deref(), Some("user_1"));

        let missing = service.approve(&admin, Uuid::new_v4(), Utc::now()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_decisions_revalidate_admin_page() {
        let (service, cache) = setup().await;
        let admin = AdminUser::for_tests("user_1");
        let sponsor = service
            .apply("spring", "user_5", application("Acme"))
            .await
            .unwrap();

        service.list(&admin, None).await.unwrap();
        assert!(cache.get(ADMIN_SPONSORS_PAGE).is_some());

        service.approve(&admin, sponsor.id, Utc::now()).await.unwrap();
        assert!(cache.get(ADMIN_SPONSORS_PAGE).is_none());

        let approved = service
            .list(&admin, Some(SponsorApprovalStatus::Approved))
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
        let pending = service
            .list(&admin, Some(SponsorApprovalStatus::Pending))
            .await
            .unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_apply_checks_tier_belongs_to_hackathon() {
        let (service, _) = setup().await;
        let admin = AdminUser::for_tests("user_1");

        let foreign = service
            .apply(
                "spring",
                "user_5",
                SponsorApplicationRequest {
                    tier_id: Some(Uuid::new_v4()),
                    ..application("Acme")
                },
            )
            .await;
        assert!(matches!(foreign, Err(AppError::NotFound(_))));

        let hackathon_id = service.find_hackathon("spring").await.unwrap().id;
        let tier = service
            .create_tier(
                &admin,
                CreateSponsorTierRequest {
                    hackathon_id,
                    name: "Gold".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        let sponsor = service
            .apply(
                "spring",
                "user_5",
                SponsorApplicationRequest {
                    tier_id: Some(tier.id),
                    ..application("Acme")
                },
            )
            .await
            .unwrap();
        assert_eq!(sponsor.tier_id, Some(tier.id));
        assert_eq!(service.tiers("spring").await.unwrap().len(), 1);
    }
}
