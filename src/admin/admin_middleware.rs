use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use super::AdminUser;
use crate::{
    error::{AppError, Result},
    middleware::auth::AuthUser,
    state::AppState,
};

/// Gate for `/api/admin` and other admin-only routes. Must run after `auth_middleware`.
pub async fn admin_authorization(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let admin = state
        .admin_policy
        .authorize(&user_id, state.config.environment)?;

    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AdminUser>()
            .cloned()
            .ok_or(AppError::Forbidden("Admin access required".to_string()))
    }
}
