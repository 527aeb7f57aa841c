//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::domain::identity::Role;
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn role_to_domain(role: user::UserRole) -> Role {
    match role {
        user::UserRole::Admin => Role::Admin,
        user::UserRole::User => Role::User,
    }
}

fn role_to_db(role: Role) -> user::UserRole {
    match role {
        Role::Admin => user::UserRole::Admin,
        Role::User => user::UserRole::User,
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        role: role_to_domain(m.role),
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
        last_login_at: m.last_login_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

async fn find_model(db: &DatabaseConnection, id: &str) -> DomainResult<user::Model> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("User", "id", id))
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, u: User) -> DomainResult<()> {
        debug!("Creating user: {}", u.email);

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(&u.email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(DomainError::Validation("Email already registered".into()));
        }

        let model = user::ActiveModel {
            id: Set(u.id),
            name: Set(u.name),
            email: Set(u.email),
            password_hash: Set(u.password_hash),
            role: Set(role_to_db(u.role)),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
            last_login_at: Set(u.last_login_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<()> {
        let mut active: user::ActiveModel = find_model(&self.db, id).await?.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let mut active: user::ActiveModel = find_model(&self.db, id).await?.into();
        active.last_login_at = Set(Some(at));
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_role(&self, id: &str, role: Role) -> DomainResult<()> {
        let mut active: user::ActiveModel = find_model(&self.db, id).await?.into();
        active.role = Set(role_to_db(role));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
