use std::sync::Arc;

use crate::{
    admin::AdminPolicy,
    auth::UnsubscribeTokens,
    cache::PageCache,
    db::DbPool,
    error::{AppError, Result},
    hackathon::{
        hackathon_repository::{HackathonRepository, MemoryHackathonRepository, PgHackathonRepository},
        HackathonService,
    },
    mailing_list::{
        mailing_list_repository::{
            MemorySubscriptionRepository, PgSubscriptionRepository, SubscriptionRepository,
        },
        MailingListService,
    },
    notification::{
        notification_repository::{
            MemoryNotificationRepository, NotificationRepository, PgNotificationRepository,
        },
        NotificationDispatcher,
    },
    sponsor::{
        sponsor_repository::{MemorySponsorRepository, PgSponsorRepository, SponsorRepository},
        SponsorService,
    },
    suggestion::{
        suggestion_repository::{
            MemorySuggestionRepository, PgSuggestionRepository, SuggestionRepository,
        },
        SuggestionService,
    },
    visit::{
        visit_repository::{MemoryVisitRepository, PgVisitRepository, VisitRepository},
        VisitTracker,
    },
    vote::{
        vote_repository::{MemoryVoteRepository, PgVoteRepository, VoteRepository},
        VoteService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: Option<DbPool>,
    pub config: Arc<Config>,
    pub admin_policy: Arc<AdminPolicy>,
    pub mailing_list_service: MailingListService,
    pub hackathon_service: HackathonService,
    pub vote_service: VoteService,
    pub notification_dispatcher: NotificationDispatcher,
    pub sponsor_service: SponsorService,
    pub suggestion_service: SuggestionService,
    pub visit_tracker: VisitTracker,
}

impl AppState {
    pub fn new(config: Arc<Config>, repositories: Repositories, db: Option<DbPool>) -> Self {
        let cache = PageCache::new();
        let admin_policy = Arc::new(AdminPolicy::from_csv(&config.admin_user_ids));

        let tokens = match &config.unsubscribe_secret {
            Some(secret) => Some(UnsubscribeTokens::new(
                secret,
                config.unsubscribe_token_ttl_hours.map(chrono::Duration::hours),
            )),
            None => {
                tracing::warn!("UNSUBSCRIBE_SECRET not set. Link-based unsubscribe is disabled.");
                None
            }
        };

        if !config.email_service_available() {
            tracing::warn!("SENDGRID_API_KEY not found. Email service will be disabled.");
        }

        let mailing_list_service = MailingListService::new(
            repositories.subscriptions.clone(),
            repositories.hackathons.clone(),
            cache.clone(),
            tokens,
            config.public_base_url.clone(),
            config.email_service_available(),
        );
        let hackathon_service = HackathonService::new(repositories.hackathons.clone());
        let vote_service = VoteService::new(
            repositories.votes.clone(),
            repositories.hackathons.clone(),
            cache.clone(),
        );
        let notification_dispatcher = NotificationDispatcher::new(
            repositories.notifications.clone(),
            repositories.hackathons.clone(),
            config.public_base_url.clone(),
        );
        let sponsor_service = SponsorService::new(
            repositories.sponsors.clone(),
            repositories.hackathons.clone(),
            cache,
        );
        let suggestion_service = SuggestionService::new(repositories.suggestions.clone());
        let visit_tracker = VisitTracker::new(repositories.visits.clone());

        Self {
            db,
            config,
            admin_policy,
            mailing_list_service,
            hackathon_service,
            vote_service,
            notification_dispatcher,
            sponsor_service,
            suggestion_service,
            visit_tracker,
        }
    }
}

/// One adapter per store, all pointing at the same backend.
#[derive(Clone)]
pub struct Repositories {
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub hackathons: Arc<dyn HackathonRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub sponsors: Arc<dyn SponsorRepository>,
    pub suggestions: Arc<dyn SuggestionRepository>,
    pub visits: Arc<dyn VisitRepository>,
}

impl Repositories {
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            subscriptions: Arc::new(PgSubscriptionRepository::new(pool.clone())),
            hackathons: Arc::new(PgHackathonRepository::new(pool.clone())),
            votes: Arc::new(PgVoteRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            sponsors: Arc::new(PgSponsorRepository::new(pool.clone())),
            suggestions: Arc::new(PgSuggestionRepository::new(pool.clone())),
            visits: Arc::new(PgVisitRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            subscriptions: Arc::new(MemorySubscriptionRepository::new()),
            hackathons: Arc::new(MemoryHackathonRepository::new()),
            votes: Arc::new(MemoryVoteRepository::new()),
            notifications: Arc::new(MemoryNotificationRepository::new()),
            sponsors: Arc::new(MemorySponsorRepository::new()),
            suggestions: Arc::new(MemorySuggestionRepository::new()),
            visits: Arc::new(MemoryVisitRepository::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::Configuration(format!(
                "{} is not a supported environment. Use either 'development' or 'production'.",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl TryFrom<String> for StorageBackend {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Configuration(format!(
                "{} is not a supported storage backend. Use either 'postgres' or 'memory'.",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub admin_user_ids: String,
    pub unsubscribe_secret: Option<String>,
    pub unsubscribe_token_ttl_hours: Option<i64>,
    pub sendgrid_api_key: Option<String>,
    pub public_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment: Environment = get("APP_ENV")
            .unwrap_or_else(|| "development".to_string())
            .try_into()?;
        let storage_backend: StorageBackend = get("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .try_into()?;

        let database_url = get("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(AppError::Configuration(
                "DATABASE_URL must be set when STORAGE_BACKEND is postgres".to_string(),
            ));
        }

        let port = get("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("PORT must be a number".to_string()))?;

        let unsubscribe_token_ttl_hours = get("UNSUBSCRIBE_TOKEN_TTL_HOURS")
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    AppError::Configuration("UNSUBSCRIBE_TOKEN_TTL_HOURS must be a number".to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            environment,
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            storage_backend,
            database_url,
            jwt_secret: get("JWT_SECRET")
                .ok_or_else(|| AppError::Configuration("JWT_SECRET must be set".to_string()))?,
            admin_user_ids: get("ADMIN_USER_IDS").unwrap_or_default(),
            unsubscribe_secret: get("UNSUBSCRIBE_SECRET"),
            unsubscribe_token_ttl_hours,
            sendgrid_api_key: get("SENDGRID_API_KEY"),
            public_base_url: get("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    pub fn email_service_available(&self) -> bool {
        self.sendgrid_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_memory_backend_needs_no_database_url() {
        let config = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 3000);
        assert!(!config.email_service_available());
        assert!(config.unsubscribe_secret.is_none());
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        let result = Config::from_lookup(lookup(&[("JWT_SECRET", "secret")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let result = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "   "),
        ]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_optional_features() {
        let config = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("APP_ENV", "production"),
            ("SENDGRID_API_KEY", "SG.key"),
            ("UNSUBSCRIBE_TOKEN_TTL_HOURS", "48"),
            ("PUBLIC_BASE_URL", "https://vibecode.party/"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert!(config.email_service_available());
        assert_eq!(config.unsubscribe_token_ttl_hours, Some(48));
        assert_eq!(config.public_base_url, "https://vibecode.party");
    }
}
