use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::vote_models::{Vote, VoteCount, VoteOutcome};
use crate::error::Result;

/// Votes are unique per (hackathon, category, voter). Counts are always
/// derived from the rows, never stored.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Casts, moves or withdraws the voter's vote in one atomic step.
    async fn toggle(
        &self,
        hackathon_id: Uuid,
        category: &str,
        voter_id: &str,
        participant_id: Uuid,
    ) -> Result<VoteOutcome>;
    async fn count_for(&self, hackathon_id: Uuid, category: &str, participant_id: Uuid) -> Result<i64>;
    async fn counts_for_hackathon(&self, hackathon_id: Uuid) -> Result<Vec<VoteCount>>;
    async fn votes_by_voter(&self, hackathon_id: Uuid, voter_id: &str) -> Result<Vec<Vote>>;
}

#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    async fn toggle(
        &self,
        hackathon_id: Uuid,
        category: &str,
        voter_id: &str,
        participant_id: Uuid,
    ) -> Result<VoteOutcome> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Vote>(
            "SELECT * FROM hackathon_votes
             WHERE hackathon_id = $1 AND category = $2 AND voter_id = $3
             FOR UPDATE",
        )
        .bind(hackathon_id)
        .bind(category)
        .bind(voter_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            Some(vote) if vote.participant_id == participant_id => {
                sqlx::query("DELETE FROM hackathon_votes WHERE id = $1")
                    .bind(vote.id)
                    .execute(&mut *tx)
                    .await?;
                VoteOutcome::Withdrawn
            }
            existing => {
                // A concurrent first vote by the same voter lands on the
                // unique key and is merged here instead of failing.
                sqlx::query(
                    "INSERT INTO hackathon_votes (hackathon_id, category, voter_id, participant_id)
                     VALUES ($1, $2, $3, $4)
                     ON CONFLICT ON CONSTRAINT hackathon_votes_unique_voter DO UPDATE SET
                        participant_id = EXCLUDED.participant_id,
                        updated_at = NOW()",
                )
                .bind(hackathon_id)
                .bind(category)
                .bind(voter_id)
                .bind(participant_id)
                .execute(&mut *tx)
                .await?;

                if existing.is_some() {
                    VoteOutcome::Changed
                } else {
                    VoteOutcome::Cast
                }
            }
        };

        tx.commit().await?;

        Ok(outcome)
    }

    async fn count_for(&self, hackathon_id: Uuid, category: &str, participant_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM hackathon_votes
             WHERE hackathon_id = $1 AND category = $2 AND participant_id = $3",
        )
        .bind(hackathon_id)
        .bind(category)
        .bind(participant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn counts_for_hackathon(&self, hackathon_id: Uuid) -> Result<Vec<VoteCount>> {
        let counts = sqlx::query_as::<_, VoteCount>(
            "SELECT category, participant_id, COUNT(*) AS votes
             FROM hackathon_votes
             WHERE hackathon_id = $1
             GROUP BY category, participant_id
             ORDER BY category, votes DESC",
        )
        .bind(hackathon_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn votes_by_voter(&self, hackathon_id: Uuid, voter_id: &str) -> Result<Vec<Vote>> {
        let votes = sqlx::query_as::<_, Vote>(
            "SELECT * FROM hackathon_votes
             WHERE hackathon_id = $1 AND voter_id = $2
             ORDER BY category",
        )
        .bind(hackathon_id)
        .bind(voter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(votes)
    }
}

#[derive(Default)]
pub struct MemoryVoteRepository {
    documents: RwLock<HashMap<Uuid, Vote>>,
}

impl MemoryVoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteRepository for MemoryVoteRepository {
    async fn toggle(
        &self,
        hackathon_id: Uuid,
        category: &str,
        voter_id: &str,
        participant_id: Uuid,
    ) -> Result<VoteOutcome> {
        let mut docs = self.documents.write().await;
        let now = Utc::now();

        let existing = docs
            .values()
            .find(|v| v.hackathon_id == hackathon_id && v.category == category && v.voter_id == voter_id)
            .map(|v| (v.id, v.participant_id));

        match existing {
            Some((id, current)) if current == participant_id => {
                docs.remove(&id);
                Ok(VoteOutcome::Withdrawn)
            }
            Some((id, _)) => {
                if let Some(vote) = docs.get_mut(&id) {
                    vote.participant_id = participant_id;
                    vote.updated_at = now;
                }
                Ok(VoteOutcome::Changed)
            }
            None => {
                let vote = Vote {
                    id: Uuid::new_v4(),
                    hackathon_id,
                    category: category.to_string(),
                    voter_id: voter_id.to_string(),
                    participant_id,
                    created_at: now,
                    updated_at: now,
                };
                docs.insert(vote.id, vote);
                Ok(VoteOutcome::Cast)
            }
        }
    }

    async fn count_for(&self, hackathon_id: Uuid, category: &str, participant_id: Uuid) -> Result<i64> {
        let docs = self.documents.read().await;
        let count = docs
            .values()
            .filter(|v| {
                v.hackathon_id == hackathon_id
                    && v.category == category
                    && v.participant_id == participant_id
            })
            .count();

        Ok(count as i64)
    }

    async fn counts_for_hackathon(&self, hackathon_id: Uuid) -> Result<Vec<VoteCount>> {
        let docs = self.documents.read().await;
        let mut tally: BTreeMap<(String, Uuid), i64> = BTreeMap::new();
        for vote in docs.values().filter(|v| v.hackathon_id == hackathon_id) {
            *tally
                .entry((vote.category.clone(), vote.participant_id))
                .or_insert(0) += 1;
        }

        let mut counts: Vec<VoteCount> = tally
            .into_iter()
            .map(|((category, participant_id), votes)| VoteCount {
                category,
                participant_id,
                votes,
            })
            .collect();
        counts.sort_by(|a, b| a.category.cmp(&b.category).then(b.votes.cmp(&a.votes)));

        Ok(counts)
    }

    async fn votes_by_voter(&self, hackathon_id: Uuid, voter_id: &str) -> Result<Vec<Vote>> {
        let docs = self.documents.read().await;
        let mut votes: Vec<Vote> = docs
            .values()
            .filter(|v| v.hackathon_id == hackathon_id && v.voter_id == voter_id)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.category.cmp(&b.category));

        Ok(votes)
    }
}
