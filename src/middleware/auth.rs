use crate::{auth::verify_jwt, error::AppError, state::AppState};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};

/// Identity of the caller, inserted into request extensions once the session token checks out.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

/// Resolves the session for every API request.
///
/// A caller without a usable session token passes through anonymously. That
/// covers a missing header as well as a malformed, forged or expired token.
/// The extractors below decide whether a route needs an identity.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        match verify_jwt(token, &state.config.jwt_secret) {
            Ok(claims) => {
                req.extensions_mut().insert(Identity(claims.sub));
            }
            Err(e) => tracing::debug!("Ignoring session token: {}", e),
        }
    }

    next.run(req).await
}

// Extractor for routes that require a signed-in caller
pub struct AuthUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .map(|identity| AuthUser(identity.0.clone()))
            .ok_or(AppError::Unauthorized("Authentication required".to_string()))
    }
}

// Extractor for routes that serve guests and signed-in callers alike
pub struct MaybeAuthUser(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(
            parts
                .extensions
                .get::<Identity>()
                .map(|identity| identity.0.clone()),
        ))
    }
}
