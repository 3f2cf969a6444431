use crate::error::{AppError, Result};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Session claims issued by the auth provider. `sub` is the provider's user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
}

/// Verify a session token and extract its claims
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    if claims.sub.trim().is_empty() {
        return Err(AppError::Unauthorized("Invalid token".to_string()));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session_token;

    #[test]
    fn test_verify_round_trip() {
        let token = session_token("user_1", "secret");
        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.sub, "user_1");
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = session_token("user_1", "secret");
        assert!(matches!(
            verify_jwt(&token, "other"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
