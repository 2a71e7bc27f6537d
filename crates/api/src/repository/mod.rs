//! User repository contract
//!
//! Handlers depend on this trait, never on the database directly. Absent rows
//! are `Ok(None)`, not errors; uniqueness and existence failures map to typed
//! variants so the HTTP layer can pick status codes without string matching.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use gatehouse_shared::User;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Record not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                RepositoryError::DuplicateEmail
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

/// Fields required to persist a new identity
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new identity and return its assigned ID
    async fn create(&self, user: &NewUser) -> Result<i64, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// All identities; authorization is the caller's responsibility
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;

    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), RepositoryError>;

    /// Replace the stored password hash wholesale
    async fn update_password_hash(
        &self,
        id: i64,
        password_hash: &str,
    ) -> Result<(), RepositoryError>;

    /// Mark the email as verified; the one-time transition is enforced by the
    /// caller checking current state first
    async fn set_email_verified(&self, id: i64) -> Result<(), RepositoryError>;

    /// Cheap connectivity probe for readiness checks
    async fn ping(&self) -> Result<(), RepositoryError>;
}

pub use postgres::PgUserRepository;
