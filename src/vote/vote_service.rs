use std::sync::Arc;

use super::{
    vote_dto::SubmitVoteRequest,
    vote_models::{SubmitVoteResponse, Vote, VoteCount},
    vote_repository::VoteRepository,
};
use crate::{
    cache::{hackathon_page, PageCache},
    error::{AppError, Result},
    hackathon::{hackathon_repository::HackathonRepository, Hackathon},
};

#[derive(Clone)]
pub struct VoteService {
    votes: Arc<dyn VoteRepository>,
    hackathons: Arc<dyn HackathonRepository>,
    cache: PageCache,
}

impl VoteService {
    pub fn new(
        votes: Arc<dyn VoteRepository>,
        hackathons: Arc<dyn HackathonRepository>,
        cache: PageCache,
    ) -> Self {
        Self {
            votes,
            hackathons,
            cache,
        }
    }

    /// Toggles the voter's vote for a participant in one category.
    ///
    /// Voting for the participant already chosen withdraws the vote, voting
    /// for anyone else moves it. The returned count is recounted from the
    /// stored rows after the write.
    pub async fn submit_vote(
        &self,
        slug: &str,
        voter: Option<&str>,
        payload: SubmitVoteRequest,
    ) -> Result<SubmitVoteResponse> {
        let voter_id = voter
            .ok_or_else(|| AppError::Unauthorized("Authentication required to vote".to_string()))?;

        let category = payload.category.trim();
        if category.is_empty() {
            return Err(AppError::Validation("Category is required".to_string()));
        }

        let hackathon = self.find_hackathon(slug).await?;
        let participant = self
            .hackathons
            .find_participant_by_id(hackathon.id, payload.participant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))?;

        let outcome = self
            .votes
            .toggle(hackathon.id, category, voter_id, participant.id)
            .await?;
        let vote_count = self
            .votes
            .count_for(hackathon.id, category, participant.id)
            .await?;

        self.cache.revalidate(&hackathon_page(slug));
        tracing::info!(
            "Vote {:?} by {} for participant {} in {}/{}",
            outcome,
            voter_id,
            participant.id,
            slug,
            category
        );

        Ok(SubmitVoteResponse {
            message: outcome.message().to_string(),
            has_voted: outcome.has_voted(),
            vote_count,
            outcome,
        })
    }

    pub async fn vote_counts(&self, slug: &str) -> Result<Vec<VoteCount>> {
        let page = hackathon_page(slug);
        if let Some(cached) = self.cache.get(&page) {
            if let Ok(counts) = serde_json::from_value(cached) {
                return Ok(counts);
            }
        }

        let generation = self.cache.generation(&page);
        let hackathon = self.find_hackathon(slug).await?;
        let counts = self.votes.counts_for_hackathon(hackathon.id).await?;
        match serde_json::to_value(&counts) {
            Ok(value) => {
                self.cache.put_if_current(&page, generation, value);
            }
            Err(e) => tracing::warn!("Could not cache vote counts for {}: {:?}", slug, e),
        }

        Ok(counts)
    }

    pub async fn my_votes(&self, slug: &str, voter_id: &str) -> Result<Vec<Vote>> {
        let hackathon = self.find_hackathon(slug).await?;
        self.votes.votes_by_voter(hackathon.id, voter_id).await
    }

    async fn find_hackathon(&self, slug: &str) -> Result<Hackathon> {
        self.hackathons
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Hackathon not found".to_string()))
    }
}
