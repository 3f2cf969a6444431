use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::hackathon_models::{Hackathon, Participant};
use crate::error::{AppError, Result};

pub struct NewHackathon {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location_type: String,
    pub has_voting: bool,
    pub voting_categories: Vec<String>,
}

/// Hackathons and their participants.
#[async_trait]
pub trait HackathonRepository: Send + Sync {
    async fn create(&self, new: &NewHackathon) -> Result<Hackathon>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Hackathon>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hackathon>>;
    /// Ordered by start date, earliest first.
    async fn list_all(&self) -> Result<Vec<Hackathon>>;

    /// Enrolls the user, returning the existing enrollment when there is one.
    async fn join(&self, hackathon_id: Uuid, user_id: &str) -> Result<Participant>;
    async fn find_participant_by_id(
        &self,
        hackathon_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<Participant>>;
    async fn notifiable_participants(&self, hackathon_id: Uuid) -> Result<Vec<Participant>>;
    async fn set_notifications(
        &self,
        hackathon_id: Uuid,
        user_id: &str,
        enabled: bool,
    ) -> Result<Option<Participant>>;
    /// Turns notifications off for every enrollment of the user. Returns the rows touched.
    async fn disable_notifications_for_user(&self, user_id: &str) -> Result<u64>;
    /// Hackathons in which the user is enrolled with notifications enabled.
    async fn notifiable_hackathon_ids(&self, user_id: &str) -> Result<Vec<Uuid>>;
}

#[derive(Clone)]
pub struct PgHackathonRepository {
    pool: PgPool,
}

impl PgHackathonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HackathonRepository for PgHackathonRepository {
    async fn create(&self, new: &NewHackathon) -> Result<Hackathon> {
        let result = sqlx::query_as::<_, Hackathon>(
            "INSERT INTO hackathons
                (slug, title, description, start_date, end_date, location_type, has_voting, voting_categories)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(&new.slug)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.location_type)
        .bind(new.has_voting)
        .bind(&new.voting_categories)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(hackathon) => Ok(hackathon),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                AppError::Validation("A hackathon with this slug already exists".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Hackathon>> {
        let hackathon = sqlx::query_as::<_, Hackathon>("SELECT * FROM hackathons WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hackathon)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hackathon>> {
        let hackathon = sqlx::query_as::<_, Hackathon>("SELECT * FROM hackathons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hackathon)
    }

    async fn list_all(&self) -> Result<Vec<Hackathon>> {
        let hackathons =
            sqlx::query_as::<_, Hackathon>("SELECT * FROM hackathons ORDER BY start_date ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(hackathons)
    }

    async fn join(&self, hackathon_id: Uuid, user_id: &str) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(
            "INSERT INTO hackathon_participants (hackathon_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (hackathon_id, user_id) DO UPDATE SET
                user_id = EXCLUDED.user_id
             RETURNING *",
        )
        .bind(hackathon_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(participant)
    }

    async fn find_participant_by_id(
        &self,
        hackathon_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            "SELECT * FROM hackathon_participants WHERE hackathon_id = $1 AND id = $2",
        )
        .bind(hackathon_id)
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    async fn notifiable_participants(&self, hackathon_id: Uuid) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(
            "SELECT * FROM hackathon_participants
             WHERE hackathon_id = $1 AND notifications_enabled = true
             ORDER BY created_at ASC",
        )
        .bind(hackathon_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    async fn set_notifications(
        &self,
        hackathon_id: Uuid,
        user_id: &str,
        enabled: bool,
    ) -> Result<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            "UPDATE hackathon_participants SET notifications_enabled = $1, updated_at = NOW()
             WHERE hackathon_id = $2 AND user_id = $3
             RETURNING *",
        )
        .bind(enabled)
        .bind(hackathon_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    async fn disable_notifications_for_user(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE hackathon_participants SET notifications_enabled = false, updated_at = NOW()
             WHERE user_id = $1 AND notifications_enabled = true",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn notifiable_hackathon_ids(&self, user_id: &str) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT hackathon_id FROM hackathon_participants
             WHERE user_id = $1 AND notifications_enabled = true",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[derive(Default)]
struct HackathonDocuments {
    hackathons: HashMap<Uuid, Hackathon>,
    participants: HashMap<Uuid, Participant>,
}

/// Document-style adapter keeping everything in process memory.
#[derive(Default)]
pub struct MemoryHackathonRepository {
    documents: RwLock<HackathonDocuments>,
}

impl MemoryHackathonRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HackathonRepository for MemoryHackathonRepository {
    async fn create(&self, new: &NewHackathon) -> Result<Hackathon> {
        let mut docs = self.documents.write().await;
        if docs.hackathons.values().any(|h| h.slug == new.slug) {
            return Err(AppError::Validation(
                "A hackathon with this slug already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let hackathon = Hackathon {
            id: Uuid::new_v4(),
            slug: new.slug.clone(),
            title: new.title.clone(),
            description: new.description.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            location_type: new.location_type.clone(),
            has_voting: new.has_voting,
            voting_categories: new.voting_categories.clone(),
            created_at: now,
            updated_at: now,
        };
        docs.hackathons.insert(hackathon.id, hackathon.clone());

        Ok(hackathon)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Hackathon>> {
        let docs = self.documents.read().await;
        Ok(docs.hackathons.values().find(|h| h.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hackathon>> {
        let docs = self.documents.read().await;
        Ok(docs.hackathons.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Hackathon>> {
        let docs = self.documents.read().await;
        let mut hackathons: Vec<Hackathon> = docs.hackathons.values().cloned().collect();
        hackathons.sort_by_key(|h| h.start_date);
        Ok(hackathons)
    }

    async fn join(&self, hackathon_id: Uuid, user_id: &str) -> Result<Participant> {
        let mut docs = self.documents.write().await;
        if let Some(existing) = docs
            .participants
            .values()
            .find(|p| p.hackathon_id == hackathon_id && p.user_id == user_id)
        {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let participant = Participant {
            id: Uuid::new_v4(),
            hackathon_id,
            user_id: user_id.to_string(),
            role: "participant".to_string(),
            notifications_enabled: true,
            created_at: now,
            updated_at: now,
        };
        docs.participants.insert(participant.id, participant.clone());

        Ok(participant)
    }

    async fn find_participant_by_id(
        &self,
        hackathon_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<Participant>> {
        let docs = self.documents.read().await;
        Ok(docs
            .participants
            .get(&participant_id)
            .filter(|p| p.hackathon_id == hackathon_id)
            .cloned())
    }

    async fn notifiable_participants(&self, hackathon_id: Uuid) -> Result<Vec<Participant>> {
        let docs = self.documents.read().await;
        let mut participants: Vec<Participant> = docs
            .participants
            .values()
            .filter(|p| p.hackathon_id == hackathon_id && p.notifications_enabled)
            .cloned()
            .collect();
        participants.sort_by_key(|p| p.created_at);
        Ok(participants)
    }

    async fn set_notifications(
        &self,
        hackathon_id: Uuid,
        user_id: &str,
        enabled: bool,
    ) -> Result<Option<Participant>> {
        let mut docs = self.documents.write().await;
        let participant = docs
            .participants
            .values_mut()
            .find(|p| p.hackathon_id == hackathon_id && p.user_id == user_id);

        Ok(participant.map(|p| {
            p.notifications_enabled = enabled;
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn disable_notifications_for_user(&self, user_id: &str) -> Result<u64> {
        let mut docs = self.documents.write().await;
        let now = Utc::now();
        let mut touched = 0;
        for participant in docs
            .participants
            .values_mut()
            .filter(|p| p.user_id == user_id && p.notifications_enabled)
        {
            participant.notifications_enabled = false;
            participant.updated_at = now;
            touched += 1;
        }
        Ok(touched)
    }

    async fn notifiable_hackathon_ids(&self, user_id: &str) -> Result<Vec<Uuid>> {
        let docs = self.documents.read().await;
        Ok(docs
            .participants
            .values()
            .filter(|p| p.user_id == user_id && p.notifications_enabled)
            .map(|p| p.hackathon_id)
            .collect())
    }
}
