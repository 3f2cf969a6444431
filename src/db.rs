use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Tables the service expects. Used by the status endpoint to report a half-applied schema.
pub const REQUIRED_TABLES: &[&str] = &[
    "mailing_list_subscriptions",
    "hackathons",
    "hackathon_participants",
    "hackathon_votes",
    "notifications",
    "hackathon_sponsor_tiers",
    "hackathon_sponsors",
    "community_suggestions",
    "user_visits",
];

/// Returns the required tables that are missing from the connected database.
pub async fn missing_tables(pool: &DbPool) -> Result<Vec<String>, sqlx::Error> {
    let present: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::text FROM information_schema.tables
         WHERE table_schema = current_schema() AND table_name = ANY($1)",
    )
    .bind(REQUIRED_TABLES)
    .fetch_all(pool)
    .await?;

    Ok(REQUIRED_TABLES
        .iter()
        .filter(|table| !present.iter().any(|p| p == *table))
        .map(|table| table.to_string())
        .collect())
}
