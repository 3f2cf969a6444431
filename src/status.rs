use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{admin::AdminUser, db, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    pub backend: String,
    pub environment: String,
    pub connection: ConnectionStatus,
    pub features: FeatureStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub missing_tables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeatureStatus {
    pub email_service: bool,
    pub token_unsubscribe: bool,
    pub admin_allowlist: bool,
}

/// Storage backend health and which optional features are configured (admin only)
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Backend status", body = StatusResponse),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn get_status(State(state): State<AppState>, _admin: AdminUser) -> Json<StatusResponse> {
    let connection = match &state.db {
        Some(pool) => match db::missing_tables(pool).await {
            Ok(missing_tables) => ConnectionStatus {
                connected: true,
                missing_tables,
                error: None,
            },
            Err(e) => {
                tracing::error!("Status check could not reach the database: {:?}", e);
                ConnectionStatus {
                    connected: false,
                    missing_tables: Vec::new(),
                    error: Some("Could not connect to the database".to_string()),
                }
            }
        },
        None => ConnectionStatus {
            connected: true,
            missing_tables: Vec::new(),
            error: None,
        },
    };

    Json(StatusResponse {
        success: connection.connected && connection.missing_tables.is_empty(),
        backend: state.config.storage_backend.as_str().to_string(),
        environment: state.config.environment.as_str().to_string(),
        connection,
        features: FeatureStatus {
            email_service: state.mailing_list_service.email_service_available(),
            token_unsubscribe: state.mailing_list_service.token_unsubscribe_available(),
            admin_allowlist: state.admin_policy.is_configured(),
        },
    })
}
