use std::sync::Arc;

use uuid::Uuid;

use super::{
    suggestion_dto::{CreateSuggestionRequest, UpdateSuggestionRequest},
    suggestion_models::{CommunitySuggestion, SuggestionVoteResponse},
    suggestion_repository::{NewSuggestion, SuggestionChanges, SuggestionRepository},
};
use crate::{
    admin::AdminUser,
    error::{AppError, Result},
};

#[derive(Clone)]
pub struct SuggestionService {
    repo: Arc<dyn SuggestionRepository>,
}

impl SuggestionService {
    pub fn new(repo: Arc<dyn SuggestionRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<CommunitySuggestion>> {
        self.repo.list_by_votes().await
    }

    /// Signed-in authors are recorded by id; guests must give a display name.
    pub async fn create(
        &self,
        caller: Option<&str>,
        payload: CreateSuggestionRequest,
    ) -> Result<CommunitySuggestion> {
        let changes = required_fields(&payload.title, &payload.description, &payload.category)?;
        let author_name = payload
            .guest_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if caller.is_none() && author_name.is_none() {
            return Err(AppError::Validation(
                "Authentication or guest name is required".to_string(),
            ));
        }

        let suggestion = self
            .repo
            .create(&NewSuggestion {
                title: changes.title,
                description: changes.description,
                category: changes.category,
                author_id: caller.map(str::to_string),
                author_name,
            })
            .await?;

        tracing::info!("Community suggestion {} created", suggestion.id);

        Ok(suggestion)
    }

    pub async fn update(
        &self,
        admin: &AdminUser,
        id: Uuid,
        payload: UpdateSuggestionRequest,
    ) -> Result<CommunitySuggestion> {
        let changes = required_fields(&payload.title, &payload.description, &payload.category)?;

        let suggestion = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Suggestion not found".to_string()))?;

        tracing::info!("Admin {} updated suggestion {}", admin.id(), id);

        Ok(suggestion)
    }

    pub async fn delete(&self, admin: &AdminUser, id: Uuid) -> Result<()> {
        if self.repo.delete(id).await? == 0 {
            return Err(AppError::NotFound("Suggestion not found".to_string()));
        }

        tracing::info!("Admin {} deleted suggestion {}", admin.id(), id);

        Ok(())
    }

    pub async fn toggle_vote(
        &self,
        voter: Option<&str>,
        suggestion_id: Uuid,
    ) -> Result<SuggestionVoteResponse> {
        let voter_id = voter
            .ok_or_else(|| AppError::Unauthorized("Authentication required to vote".to_string()))?;

        let suggestion = self
            .repo
            .toggle_vote(suggestion_id, voter_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Suggestion not found".to_string()))?;

        Ok(SuggestionVoteResponse {
            id: suggestion.id,
            votes_count: suggestion.votes_count,
            has_voted: suggestion.voter_ids.iter().any(|v| v == voter_id),
        })
    }
}

fn required_fields(title: &str, description: &str, category: &str) -> Result<SuggestionChanges> {
    let (title, description, category) = (title.trim(), description.trim(), category.trim());
    if title.is_empty() || description.is_empty() || category.is_empty() {
        return Err(AppError::Validation(
            "Title, description, and category are required".to_string(),
        ));
    }

    Ok(SuggestionChanges {
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::suggestion_repository::MemorySuggestionRepository;

    fn service() -> SuggestionService {
        SuggestionService::new(Arc::new(MemorySuggestionRepository::new()))
    }

    fn request(title: &str, guest_name: Option<&str>) -> CreateSuggestionRequest {
        CreateSuggestionRequest {
            title: title.to_string(),
            description: "Weekend game jam".to_string(),
            category: "event".to_string(),
            guest_name: guest_name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_guest_needs_a_name() {
        let service = service();

        let anonymous = service.create(None, request("Jam", None)).await;
        assert!(matches!(anonymous, Err(AppError::Validation(_))));

        let guest = service.create(None, request("Jam", Some("Ada"))).await.unwrap();
        assert_eq!(guest.author_name.as_deref(), Some("Ada"));
        assert!(guest.author_id.is_none());

        let member = service.create(Some("user_2"), request("Jam", None)).await.unwrap();
        assert_eq!(member.author_id.as_deref(), Some("user_2"));
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let service = service();
        let blank = service.create(Some("user_2"), request("  ", None)).await;
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_vote_toggles_and_orders_list() {
        let service = service();
        let first = service.create(Some("user_2"), request("First", None)).await.unwrap();
        let second = service.create(Some("user_2"), request("Second", None)).await.unwrap();

        let voted = service.toggle_vote(Some("user_3"), second.id).await.unwrap();
        assert!(voted.has_voted);
        assert_eq!(voted.votes_count, 1);

        let listed = service.list().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        let unvoted = service.toggle_vote(Some("user_3"), second.id).await.unwrap();
        assert!(!unvoted.has_voted);
        assert_eq!(unvoted.votes_count, 0);

        let anonymous = service.toggle_vote(None, second.id).await;
        assert!(matches!(anonymous, Err(AppError::Unauthorized(_))));

        let missing = service.toggle_vote(Some("user_3"), Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_admin_update_and_delete() {
        let service = service();
        let admin = AdminUser::for_tests("user_1");
        let created = service.create(Some("user_2"), request("Jam", None)).await.unwrap();

        let updated = service
            .update(
                &admin,
                created.id,
                UpdateSuggestionRequest {
                    title: "Game jam".to_string(),
                    description: "Two days".to_string(),
                    category: "event".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Game jam");

        service.delete(&admin, created.id).await.unwrap();
        let again = service.delete(&admin, created.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }
}
