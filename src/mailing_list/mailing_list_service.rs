use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    mailing_list_dto::SubscribeRequest,
    mailing_list_models::{
        MailingListAck, MailingListPreferences, Subscription, TokenUnsubscribeOutcome,
        UnsubscribeLink,
    },
    mailing_list_repository::{NewSubscription, SubscriptionRepository},
};
use crate::{
    admin::AdminUser,
    auth::{decode_email, normalize_email, UnsubscribeTokens},
    cache::{PageCache, MAILING_LIST_PAGE},
    error::{AppError, Result},
    hackathon::hackathon_repository::HackathonRepository,
};

#[derive(Clone)]
pub struct MailingListService {
    repo: Arc<dyn SubscriptionRepository>,
    hackathons: Arc<dyn HackathonRepository>,
    cache: PageCache,
    tokens: Option<UnsubscribeTokens>,
    public_base_url: String,
    email_service_available: bool,
}

impl MailingListService {
    pub fn new(
        repo: Arc<dyn SubscriptionRepository>,
        hackathons: Arc<dyn HackathonRepository>,
        cache: PageCache,
        tokens: Option<UnsubscribeTokens>,
        public_base_url: String,
        email_service_available: bool,
    ) -> Self {
        Self {
            repo,
            hackathons,
            cache,
            tokens,
            public_base_url,
            email_service_available,
        }
    }

    pub fn email_service_available(&self) -> bool {
        self.email_service_available
    }

    pub fn token_unsubscribe_available(&self) -> bool {
        self.tokens.is_some()
    }

    /// Subscribes `payload.email`, re-activating its record if it already exists.
    ///
    /// The email is the lookup key. When the record belongs to another
    /// identity the caller takes it over; a guest keeps the stored identity.
    pub async fn subscribe(
        &self,
        caller: Option<&str>,
        payload: SubscribeRequest,
    ) -> Result<MailingListAck> {
        let email = normalize_email(&payload.email);
        if email.is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }

        if let (Some(caller), Some(existing)) = (caller, self.repo.find_by_email(&email).await?) {
            if let Some(owner) = existing.user_id.as_deref().filter(|owner| *owner != caller) {
                tracing::warn!(
                    "Subscription {} for {} moves from user {} to user {}",
                    existing.id,
                    email,
                    owner,
                    caller
                );
            }
        }

        let new = NewSubscription {
            user_id: caller.map(str::to_string),
            email,
            name: payload
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            preferences: payload.preferences,
        };

        let subscription = self.repo.upsert_by_email(&new).await?;
        self.cache.revalidate(MAILING_LIST_PAGE);
        tracing::info!("Subscribed {} to the mailing list", subscription.email);

        Ok(self.ack(subscription))
    }

    pub async fn unsubscribe(&self, user_id: &str) -> Result<MailingListAck> {
        let existing = self
            .repo
            .find_for_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

        let subscription = self
            .repo
            .mark_unsubscribed(existing.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

        self.cache.revalidate(MAILING_LIST_PAGE);
        tracing::info!("User {} unsubscribed from the mailing list", user_id);

        Ok(self.ack(subscription))
    }

    pub async fn update_preferences(
        &self,
        caller: Option<&str>,
        preferences: MailingListPreferences,
    ) -> Result<MailingListAck> {
        let user_id =
            caller.ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

        let subscription = self
            .repo
            .update_active_preferences(user_id, preferences)
            .await?
            .ok_or_else(|| AppError::NotFound("Active subscription not found".to_string()))?;

        self.cache.revalidate(MAILING_LIST_PAGE);

        Ok(self.ack(subscription))
    }

    /// The caller's record, active or not. Anonymous callers simply have none.
    pub async fn get_subscription(&self, caller: Option<&str>) -> Result<Option<Subscription>> {
        match caller {
            Some(user_id) => self.repo.find_for_user(user_id).await,
            None => Ok(None),
        }
    }

    /// Unsubscribes the address carried by an emailed link and mutes every
    /// hackathon enrollment of the identity behind it.
    pub async fn unsubscribe_with_token(
        &self,
        encoded_email: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenUnsubscribeOutcome> {
        let tokens = self.tokens()?;
        let email = decode_email(encoded_email)?;

        if !tokens.verify(&email, token, now) {
            return Err(AppError::Unauthorized(
                "Invalid or expired unsubscribe link".to_string(),
            ));
        }

        let subscription = self.repo.find_by_email(&email).await?.ok_or_else(|| {
            AppError::NotFound("No subscription found for this email address".to_string())
        })?;

        self.repo.mark_unsubscribed(subscription.id).await?;

        let participations_muted = match subscription.user_id.as_deref() {
            Some(user_id) => self.hackathons.disable_notifications_for_user(user_id).await?,
            None => 0,
        };

        self.cache.revalidate(MAILING_LIST_PAGE);
        tracing::info!(
            "Unsubscribed {} by link, muted {} hackathon enrollments",
            email,
            participations_muted
        );

        Ok(TokenUnsubscribeOutcome {
            email,
            participations_muted,
            message: "Successfully unsubscribed from all hackathon notifications".to_string(),
        })
    }

    pub async fn list_subscriptions(&self, _admin: &AdminUser) -> Result<Vec<Subscription>> {
        if let Some(page) = self.cache.get(MAILING_LIST_PAGE) {
            if let Ok(subscriptions) = serde_json::from_value(page) {
                return Ok(subscriptions);
            }
        }

        let generation = self.cache.generation(MAILING_LIST_PAGE);
        let subscriptions = self.repo.list_all().await?;
        match serde_json::to_value(&subscriptions) {
            Ok(page) => {
                self.cache.put_if_current(MAILING_LIST_PAGE, generation, page);
            }
            Err(e) => tracing::warn!("Could not cache mailing list page: {:?}", e),
        }

        Ok(subscriptions)
    }

    pub async fn delete_subscription(&self, admin: &AdminUser, id: Uuid) -> Result<()> {
        if self.repo.delete(id).await? == 0 {
            return Err(AppError::NotFound("Subscription not found".to_string()));
        }

        self.cache.revalidate(MAILING_LIST_PAGE);
        tracing::info!("Admin {} deleted subscription {}", admin.id(), id);

        Ok(())
    }

    pub async fn unsubscribe_link(
        &self,
        _admin: &AdminUser,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<UnsubscribeLink> {
        let tokens = self.tokens()?;
        let subscription = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

        let link = tokens.unsubscribe_link(&self.public_base_url, &subscription.email, now)?;

        Ok(UnsubscribeLink {
            email: subscription.email,
            link,
        })
    }

    fn tokens(&self) -> Result<&UnsubscribeTokens> {
        self.tokens.as_ref().ok_or_else(|| {
            AppError::Configuration("Set UNSUBSCRIBE_SECRET to enable unsubscribe links".to_string())
        })
    }

    fn ack(&self, subscription: Subscription) -> MailingListAck {
        MailingListAck {
            subscription,
            email_service_available: self.email_service_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::unsubscribe_token::encode_email,
        dto::ActionResponse,
        hackathon::hackathon_repository::{MemoryHackathonRepository, NewHackathon},
        mailing_list::mailing_list_repository::MemorySubscriptionRepository,
    };

    struct Fixture {
        service: MailingListService,
        hackathons: Arc<MemoryHackathonRepository>,
        cache: PageCache,
    }

    fn fixture(tokens: Option<UnsubscribeTokens>) -> Fixture {
        let hackathons = Arc::new(MemoryHackathonRepository::new());
        let cache = PageCache::new();
        let service = MailingListService::new(
            Arc::new(MemorySubscriptionRepository::new()),
            hackathons.clone(),
            cache.clone(),
            tokens,
            "https://vibecode.party".to_string(),
            false,
        );
        Fixture {
            service,
            hackathons,
            cache,
        }
    }

    fn request(email: &str, marketing: bool) -> SubscribeRequest {
        SubscribeRequest {
            email: email.to_string(),
            name: Some("Ada".to_string()),
            preferences: MailingListPreferences {
                marketing,
                updates: true,
            },
        }
    }

    #[tokio::test]
    async fn test_subscribe_twice_keeps_one_record_with_latest_preferences() {
        let f = fixture(None);
        let admin = AdminUser::for_tests("user_1");

        let first = f
            .service
            .subscribe(Some("user_2"), request("ada@example.com", true))
            .await
            .unwrap();
        let second = f
            .service
            .subscribe(Some("user_2"), request("ADA@example.com ", false))
            .await
            .unwrap();

        assert_eq!(first.subscription.id, second.subscription.id);
        assert!(!second.subscription.preferences.marketing);

        let all = f.service.list_subscriptions(&admin).await.unwrap();
        let active: Vec<_> = all
            .iter()
            .filter(|s| s.email == "ada@example.com" && s.is_active())
            .collect();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_resubscribe_after_unsubscribe_reuses_record() {
        let f = fixture(None);
        let original = f
            .service
            .subscribe(Some("user_2"), request("ada@example.com", true))
            .await
            .unwrap();

        let gone = f.service.unsubscribe("user_2").await.unwrap();
        assert!(gone.subscription.unsubscribed_at.is_some());

        let back = f
            .service
            .subscribe(Some("user_2"), request("ada@example.com", true))
            .await
            .unwrap();
        assert_eq!(back.subscription.id, original.subscription.id);
        assert_eq!(back.subscription.email, "ada@example.com");
        assert!(back.subscription.unsubscribed_at.is_none());
    }

    #[tokio::test]
    async fn test_unsubscribe_twice_keeps_first_timestamp() {
        let f = fixture(None);
        f.service
            .subscribe(Some("user_2"), request("ada@example.com", true))
            .await
            .unwrap();

        let first = f.service.unsubscribe("user_2").await.unwrap();
        let second = f.service.unsubscribe("user_2").await.unwrap();
        assert_eq!(
            first.subscription.unsubscribed_at,
            second.subscription.unsubscribed_at
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_without_record_is_not_found() {
        let f = fixture(None);
        let result = f.service.unsubscribe("user_9").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_subscription_for_anonymous_caller_is_null() {
        let f = fixture(None);
        let response: ActionResponse<Option<Subscription>> =
            f.service.get_subscription(None).await.into();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": null }));
    }

    #[tokio::test]
    async fn test_get_subscription_returns_inactive_records() {
        let f = fixture(None);
        f.service
            .subscribe(Some("user_2"), request("ada@example.com", true))
            .await
            .unwrap();
        f.service.unsubscribe("user_2").await.unwrap();

        let found = f.service.get_subscription(Some("user_2")).await.unwrap();
        assert!(found.is_some_and(|s| !s.is_active()));
        assert!(f.service.get_subscription(Some("user_3")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_preferences_requires_identity_and_active_record() {
        let f = fixture(None);
        let prefs = MailingListPreferences {
            marketing: false,
            updates: false,
        };

        let anonymous = f.service.update_preferences(None, prefs).await;
        assert!(matches!(anonymous, Err(AppError::Unauthorized(_))));

        f.service
            .subscribe(Some("user_2"), request("ada@example.com", true))
            .await
            .unwrap();
        let updated = f.service.update_preferences(Some("user_2"), prefs).await.unwrap();
        assert_eq!(updated.subscription.preferences, prefs);

        f.service.unsubscribe("user_2").await.unwrap();
        let inactive = f.service.update_preferences(Some("user_2"), prefs).await;
        assert!(matches!(inactive, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_email_moves_to_latest_identity_but_not_to_guest() {
        let f = fixture(None);
        f.service
            .subscribe(Some("user_2"), request("ada@example.com", true))
            .await
            .unwrap();

        let guest = f
            .service
            .subscribe(None, request("ada@example.com", true))
            .await
            .unwrap();
        assert_eq!(guest.subscription.user_id.as_deref(), Some("user_2"));

        let claimed = f
            .service
            .subscribe(Some("user_3"), request("ada@example.com", true))
            .await
            .unwrap();
        assert_eq!(claimed.subscription.user_id.as_deref(), Some("user_3"));
        assert!(f.service.get_subscription(Some("user_2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_writes_revalidate_mailing_list_page() {
        let f = fixture(None);
        let admin = AdminUser::for_tests("user_1");

        f.service.list_subscriptions(&admin).await.unwrap();
        assert!(f.cache.get(MAILING_LIST_PAGE).is_some());

        f.service
            .subscribe(None, request("ada@example.com", true))
            .await
            .unwrap();
        assert!(f.cache.get(MAILING_LIST_PAGE).is_none());

        let listed = f.service.list_subscriptions(&admin).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_token_unsubscribe_mutes_enrollments() {
        let tokens = UnsubscribeTokens::new("secret", None);
        let f = fixture(Some(tokens.clone()));
        let now = Utc::now();

        let hackathon = f
            .hackathons
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
        f.hackathons.join(hackathon.id, "user_2").await.unwrap();

        f.service
            .subscribe(Some("user_2"), request("ada@example.com", true))
            .await
            .unwrap();

        let token = tokens.issue("ada@example.com", now).unwrap();
        let outcome = f
            .service
            .unsubscribe_with_token(&encode_email("ada@example.com"), &token, now)
            .await
            .unwrap();

        assert_eq!(outcome.email, "ada@example.com");
        assert_eq!(outcome.participations_muted, 1);
        assert!(f
            .hackathons
            .notifiable_participants(hackathon.id)
            .await
            .unwrap()
            .is_empty());
        let record = f.service.get_subscription(Some("user_2")).await.unwrap().unwrap();
        assert!(!record.is_active());
    }

    #[tokio::test]
    async fn test_token_unsubscribe_rejects_foreign_token() {
        let tokens = UnsubscribeTokens::new("secret", None);
        let f = fixture(Some(tokens.clone()));
        let now = Utc::now();
        f.service
            .subscribe(None, request("ada@example.com", true))
            .await
            .unwrap();

        let token_for_other = tokens.issue("grace@example.com", now).unwrap();
        let result = f
            .service
            .unsubscribe_with_token(&encode_email("ada@example.com"), &token_for_other, now)
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));

        let unknown_token = tokens.issue("nobody@example.com", now).unwrap();
        let unknown = f
            .service
            .unsubscribe_with_token(&encode_email("nobody@example.com"), &unknown_token, now)
            .await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_token_unsubscribe_needs_secret() {
        let f = fixture(None);
        let result = f
            .service
            .unsubscribe_with_token(&encode_email("ada@example.com"), "token", Utc::now())
            .await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_admin_link_and_delete() {
        let tokens = UnsubscribeTokens::new("secret", None);
        let f = fixture(Some(tokens.clone()));
        let admin = AdminUser::for_tests("user_1");
        let now = Utc::now();

        let ack = f
            .service
            .subscribe(None, request("ada@example.com", true))
            .await
            .unwrap();

        let link = f
            .service
            .unsubscribe_link(&admin, ack.subscription.id, now)
            .await
            .unwrap();
        assert!(link.link.starts_with("https://vibecode.party/unsubscribe?token="));

        f.service
            .delete_subscription(&admin, ack.subscription.id)
            .await
            .unwrap();
        let again = f.service.delete_subscription(&admin, ack.subscription.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }
}
