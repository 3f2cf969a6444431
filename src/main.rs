mod admin;
mod auth;
mod cache;
mod db;
mod dto;
mod error;
mod hackathon;
mod mailing_list;
mod middleware;
mod notification;
mod routes;
mod sponsor;
mod state;
mod status;
mod suggestion;
mod visit;
mod vote;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use db::{create_pool, run_migrations};
use routes::create_router;
use state::{AppState, Config, Repositories, StorageBackend};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hackathon_hub=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let (repositories, db) = match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORAGE_BACKEND is postgres")?;

            tracing::info!("Connecting to database...");
            let db = create_pool(database_url).await?;

            tracing::info!("Running migrations...");
            run_migrations(&db).await?;

            (Repositories::postgres(db.clone()), Some(db))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage. Data is lost on restart.");
            (Repositories::in_memory(), None)
        }
    };

    let state = AppState::new(config.clone(), repositories, db);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "Server starting on http://{} ({} backend, {})",
        addr,
        config.storage_backend.as_str(),
        config.environment.as_str()
    );
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
