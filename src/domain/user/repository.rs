//! User repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::User;
use crate::domain::identity::Role;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; rejects duplicate email with
    /// `DomainError::Validation`
    async fn create(&self, user: User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Overwrite the password hash
    async fn set_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<()>;

    /// Record a successful login
    async fn set_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;

    /// Change a user's role
    async fn set_role(&self, id: &str, role: Role) -> DomainResult<()>;

    /// Total number of registered users
    async fn count(&self) -> DomainResult<u64>;
}
