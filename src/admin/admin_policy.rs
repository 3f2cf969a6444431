use std::collections::HashSet;

use crate::{
    error::{AppError, Result},
    state::Environment,
};

/// Allowlist of identities allowed to run administrative actions.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    admin_ids: HashSet<String>,
}

/// Proof that the wrapped identity passed the admin check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(String);

impl AdminUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl AdminPolicy {
    /// Parses a comma separated list such as `ADMIN_USER_IDS=user_1, user_2`.
    pub fn from_csv(raw: &str) -> Self {
        let admin_ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        Self { admin_ids }
    }

    pub fn is_configured(&self) -> bool {
        !self.admin_ids.is_empty()
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_ids.contains(user_id)
    }

    pub fn authorize(&self, user_id: &str, environment: Environment) -> Result<AdminUser> {
        if !self.is_configured() && environment == Environment::Development {
            return Err(AppError::Configuration(
                "Admin access requires ADMIN_USER_IDS to be set".to_string(),
            ));
        }

        if !self.is_admin(user_id) {
            tracing::warn!("Rejected admin action for user {}", user_id);
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminUser(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_and_trims_ids() {
        let policy = AdminPolicy::from_csv(" user_1 ,user_2,, ");
        assert!(policy.is_admin("user_1"));
        assert!(policy.is_admin("user_2"));
        assert!(!policy.is_admin(""));
        assert!(!policy.is_admin("user_3"));
    }

    #[test]
    fn test_authorize_member() {
        let policy = AdminPolicy::from_csv("user_1");
        let admin = policy.authorize("user_1", Environment::Production).unwrap();
        assert_eq!(admin.id(), "user_1");
    }

    #[test]
    fn test_non_member_is_forbidden() {
        let policy = AdminPolicy::from_csv("user_1");
        assert!(matches!(
            policy.authorize("user_2", Environment::Development),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_unconfigured_allowlist() {
        let policy = AdminPolicy::from_csv("");
        assert!(matches!(
            policy.authorize("user_1", Environment::Development),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            policy.authorize("user_1", Environment::Production),
            Err(AppError::Forbidden(_))
        ));
    }
}

#[cfg(test)]
impl AdminUser {
    pub fn for_tests(id: &str) -> Self {
        AdminUser(id.to_string())
    }
}
