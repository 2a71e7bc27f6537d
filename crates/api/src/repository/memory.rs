//! In-memory repository used by handler tests

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use gatehouse_shared::{User, DEFAULT_ROLE};
use time::OffsetDateTime;

use super::{NewUser, RepositoryError, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror of the out-of-band administrative role change
    pub fn set_role(&self, id: i64, role: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.role = role.to_string();
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<i64, RepositoryError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::DuplicateEmail);
        }

        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let now = OffsetDateTime::now_utc();
        users.push(User {
            id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: DEFAULT_ROLE.to_string(),
            is_active: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.lock().unwrap();
        Ok(users.clone())
    }

    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;

        user.first_name = first_name.to_string();
        user.last_name = last_name.to_string();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: i64,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;

        user.password_hash = password_hash.to_string();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn set_email_verified(&self, id: i64) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;

        user.email_verified = true;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
