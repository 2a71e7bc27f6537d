//! Common types shared across the Gatehouse services

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Role assigned to every new account. Promotion to other roles happens only
/// through administrative action outside this service.
pub const DEFAULT_ROLE: &str = "user";

/// A persisted account identity.
///
/// The password hash never leaves the service: it is skipped during
/// serialization so handlers can return the struct directly.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub email_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Capability check for role-gated operations. Roles are an exact match;
    /// there is no implicit hierarchy.
    pub fn has_role(&self, required: &str) -> bool {
        self.role == required
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user(role: &str) -> User {
        User {
            id: 1,
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: role.to_string(),
            is_active: true,
            email_verified: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_has_role_exact_match() {
        let admin = sample_user("admin");
        assert!(admin.has_role("admin"));
        assert!(!admin.has_role("user"));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = sample_user("user");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}
