use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const PURPOSE: &str = "unsubscribe";

#[derive(Debug, Serialize, Deserialize)]
struct UnsubscribeClaims {
    sub: String,
    purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Issues and checks unsubscribe tokens bound to an email address.
///
/// A token is an HS256 JWT over the normalized email. Encoding is
/// deterministic, so the same (email, secret, expiry) always yields the
/// same token. Without a TTL a token stays valid for as long as the secret
/// does; anyone holding it can unsubscribe that address.
#[derive(Clone)]
pub struct UnsubscribeTokens {
    secret: String,
    ttl: Option<Duration>,
}

impl UnsubscribeTokens {
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        Self {
            secret: secret.to_string(),
            ttl,
        }
    }

    pub fn issue(&self, email: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = UnsubscribeClaims {
            sub: normalize_email(email),
            purpose: PURPOSE.to_string(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!("Failed to sign unsubscribe token: {:?}", e);
            AppError::InternalError
        })
    }

    pub fn verify(&self, email: &str, token: &str, now: DateTime<Utc>) -> bool {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = match decode::<UnsubscribeClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!("Unsubscribe token rejected: {:?}", e);
                return false;
            }
        };

        if claims.purpose != PURPOSE || claims.sub != normalize_email(email) {
            tracing::debug!("Unsubscribe token is bound to a different email");
            return false;
        }

        match (self.ttl, claims.exp) {
            (None, _) => true,
            (Some(_), Some(exp)) => now.timestamp() <= exp,
            (Some(_), None) => {
                tracing::debug!("Unsubscribe token lacks an expiry while one is enforced");
                false
            }
        }
    }

    /// Absolute link a recipient can follow to unsubscribe without logging in.
    pub fn unsubscribe_link(&self, base_url: &str, email: &str, now: DateTime<Utc>) -> Result<String> {
        let token = self.issue(email, now)?;
        Ok(format!(
            "{}/unsubscribe?token={}&email={}",
            base_url.trim_end_matches('/'),
            token,
            encode_email(email)
        ))
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn encode_email(email: &str) -> String {
    URL_SAFE_NO_PAD.encode(normalize_email(email))
}

pub fn decode_email(encoded: &str) -> Result<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|_| AppError::Validation("Malformed email in unsubscribe link".to_string()))?;
    let email = String::from_utf8(bytes)
        .map_err(|_| AppError::Validation("Malformed email in unsubscribe link".to_string()))?;
    Ok(normalize_email(&email))
}
