use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::sponsor_models::{Sponsor, SponsorApprovalStatus, SponsorTier};
use crate::error::Result;

pub struct NewSponsor {
    pub hackathon_id: Uuid,
    pub tier_id: Option<Uuid>,
    pub name: String,
    pub link: Option<String>,
}

pub struct NewSponsorTier {
    pub hackathon_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// An admin's verdict on an application. Both verdicts record who decided and when.
pub struct SponsorDecision {
    pub status: SponsorApprovalStatus,
    pub decided_by: String,
    pub decided_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
}

#[async_trait]
pub trait SponsorRepository: Send + Sync {
    /// New applications start out pending.
    async fn create(&self, new: &NewSponsor) -> Result<Sponsor>;
    /// Newest first.
    async fn list(
        &self,
        hackathon_id: Option<Uuid>,
        status: Option<SponsorApprovalStatus>,
    ) -> Result<Vec<Sponsor>>;
    async fn set_decision(&self, id: Uuid, decision: &SponsorDecision) -> Result<Option<Sponsor>>;

    async fn create_tier(&self, new: &NewSponsorTier) -> Result<SponsorTier>;
    async fn find_tier(&self, id: Uuid) -> Result<Option<SponsorTier>>;
    async fn list_tiers(&self, hackathon_id: Uuid) -> Result<Vec<SponsorTier>>;
}

#[derive(Clone)]
pub struct PgSponsorRepository {
    pool: PgPool,
}

impl PgSponsorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SponsorRepository for PgSponsorRepository {
    async fn create(&self, new: &NewSponsor) -> Result<Sponsor> {
        let sponsor = sqlx::query_as::<_, Sponsor>(
            "INSERT INTO hackathon_sponsors (hackathon_id, tier_id, name, link, approval_status)
             VALUES ($1, $2, $3, $4, 'pending')
             RETURNING *",
        )
        .bind(new.hackathon_id)
        .bind(new.tier_id)
        .bind(&new.name)
        .bind(&new.link)
        .fetch_one(&self.pool)
        .await?;

        Ok(sponsor)
    }

    async fn list(
        &self,
        hackathon_id: Option<Uuid>,
        status: Option<SponsorApprovalStatus>,
    ) -> Result<Vec<Sponsor>> {
        let sponsors = sqlx::query_as::<_, Sponsor>(
            "SELECT * FROM hackathon_sponsors
             WHERE ($1::uuid IS NULL OR hackathon_id = $1)
               AND ($2::text IS NULL OR approval_status = $2)
             ORDER BY created_at DESC",
        )
        .bind(hackathon_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(sponsors)
    }

    async fn set_decision(&self, id: Uuid, decision: &SponsorDecision) -> Result<Option<Sponsor>> {
        let sponsor = sqlx::query_as::<_, Sponsor>(
            "UPDATE hackathon_sponsors SET
                approval_status = $2,
                approved_by = $3,
                approved_at = $4,
                rejection_reason = $5,
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(decision.status.as_str())
        .bind(&decision.decided_by)
        .bind(decision.decided_at)
        .bind(&decision.rejection_reason)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sponsor)
    }

    async fn create_tier(&self, new: &NewSponsorTier) -> Result<SponsorTier> {
        let tier = sqlx::query_as::<_, SponsorTier>(
            "INSERT INTO hackathon_sponsor_tiers (hackathon_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(new.hackathon_id)
        .bind(&new.name)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(tier)
    }

    async fn find_tier(&self, id: Uuid) -> Result<Option<SponsorTier>> {
        let tier =
            sqlx::query_as::<_, SponsorTier>("SELECT * FROM hackathon_sponsor_tiers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(tier)
    }

    async fn list_tiers(&self, hackathon_id: Uuid) -> Result<Vec<SponsorTier>> {
        let tiers = sqlx::query_as::<_, SponsorTier>(
            "SELECT * FROM hackathon_sponsor_tiers WHERE hackathon_id = $1 ORDER BY created_at",
        )
        .bind(hackathon_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tiers)
    }
}

#[derive(Default)]
struct SponsorDocuments {
    sponsors: HashMap<Uuid, Sponsor>,
    tiers: HashMap<Uuid, SponsorTier>,
}

#[derive(Default)]
pub struct MemorySponsorRepository {
    documents: RwLock<SponsorDocuments>,
}

impl MemorySponsorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SponsorRepository for MemorySponsorRepository {
    async fn create(&self, new: &NewSponsor) -> Result<Sponsor> {
        let now = Utc::now();
        let sponsor = Sponsor {
            id: Uuid::new_v4(),
            hackathon_id: new.hackathon_id,
            tier_id: new.tier_id,
            name: new.name.clone(),
            link: new.link.clone(),
            approval_status: SponsorApprovalStatus::Pending,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };

        let mut docs = self.documents.write().await;
        docs.sponsors.insert(sponsor.id, sponsor.clone());

        Ok(sponsor)
    }

    async fn list(
        &self,
        hackathon_id: Option<Uuid>,
        status: Option<SponsorApprovalStatus>,
    ) -> Result<Vec<Sponsor>> {
        let docs = self.documents.read().await;
        let mut sponsors: Vec<Sponsor> = docs
            .sponsors
            .values()
            .filter(|s| hackathon_id.map_or(true, |id| s.hackathon_id == id))
            .filter(|s| status.map_or(true, |status| s.approval_status == status))
            .cloned()
            .collect();
        sponsors.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(sponsors)
    }

    async fn set_decision(&self, id: Uuid, decision: &SponsorDecision) -> Result<Option<Sponsor>> {
        let mut docs = self.documents.write().await;

        Ok(docs.sponsors.get_mut(&id).map(|s| {
            s.approval_status = decision.status;
            s.approved_by = Some(decision.decided_by.clone());
            s.approved_at = Some(decision.decided_at);
            s.rejection_reason = decision.rejection_reason.clone();
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn create_tier(&self, new: &NewSponsorTier) -> Result<SponsorTier> {
        let now = Utc::now();
        let tier = SponsorTier {
            id: Uuid::new_v4(),
            hackathon_id: new.hackathon_id,
            name: new.name.clone(),
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut docs = self.documents.write().await;
        docs.tiers.insert(tier.id, tier.clone());

        Ok(tier)
    }

    async fn find_tier(&self, id: Uuid) -> Result<Option<SponsorTier>> {
        let docs = self.documents.read().await;
        Ok(docs.tiers.get(&id).cloned())
    }

    async fn list_tiers(&self, hackathon_id: Uuid) -> Result<Vec<SponsorTier>> {
        let docs = self.documents.read().await;
        let mut tiers: Vec<SponsorTier> = docs
            .tiers
            .values()
            .filter(|t| t.hackathon_id == hackathon_id)
            .cloned()
            .collect();
        tiers.sort_by_key(|t| t.created_at);

        Ok(tiers)
    }
}
