use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::{
    auth::jwt::Claims,
    state::{AppState, Config, Repositories},
};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Signs a session token the way the auth provider would.
pub fn session_token(user_id: &str, secret: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(format!("{}@example.com", user_id)),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", session_token(user_id, TEST_JWT_SECRET))
}

pub fn test_config(vars: &[(&str, &str)]) -> Config {
    let mut all = vec![
        ("STORAGE_BACKEND", "memory"),
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("UNSUBSCRIBE_SECRET", "test-unsubscribe-secret"),
        ("PUBLIC_BASE_URL", "https://vibecode.party"),
    ];
    all.extend_from_slice(vars);

    Config::from_lookup(|key| {
        all.iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .unwrap()
}

/// Application state over the in-memory adapters with `user_1` as the only admin.
pub fn memory_state() -> AppState {
    memory_state_with(&[("ADMIN_USER_IDS", "user_1")])
}

pub fn memory_state_with(vars: &[(&str, &str)]) -> AppState {
    AppState::new(
        Arc::new(test_config(vars)),
        Repositories::in_memory(),
        None,
    )
}
