use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserLookup, UserResult};
use crate::models::{NewUser, User, UserId};

/// Repository trait for User persistence.
///
/// Every operation ignores soft-deleted users except [`email_retained`].
///
/// [`email_retained`]: UserRepository::email_retained
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; storage assigns id and timestamps.
    ///
    /// Fails with `ConstraintViolation` when an active user already holds the email.
    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// All active users, ascending by id
    async fn find_all(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: UserId) -> UserResult<User>;

    async fn find_by_email(&self, email: &str) -> UserResult<User>;

    /// Persist name, email and password hash of an active user, keyed by id
    async fn update(&self, user: User) -> UserResult<User>;

    /// Soft-delete an active user
    async fn delete(&self, id: UserId) -> UserResult<()>;

    /// Whether a soft-deleted user still holds `email`
    async fn email_retained(&self, email: &str) -> UserResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<UserId, User>,
    last_id: UserId,
}

impl Store {
    fn active(&self) -> impl Iterator<Item = &User> {
        self.users.values().filter(|u| u.deleted_at.is_none())
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.active()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

fn email_conflict() -> UserError {
    UserError::ConstraintViolation(
        "duplicate key value violates unique constraint \"uq_users_email_active\"".to_string(),
    )
}

/// In-memory implementation of UserRepository (for development/testing).
///
/// Mirrors the Postgres schema: ids come from a monotonic sequence and the
/// email is unique among active users.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&user.email, None) {
            return Err(email_conflict());
        }

        store.last_id += 1;
        let now = Utc::now();
        let created = User {
            id: store.last_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        store.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.active().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> UserResult<User> {
        let store = self.store.read().await;
        store
            .active()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(UserError::NotFound(UserLookup::Id(id)))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<User> {
        let store = self.store.read().await;
        store
            .active()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| UserError::NotFound(UserLookup::Email(email.to_string())))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&user.email, Some(user.id)) {
            return Err(email_conflict());
        }

        let stored = store
            .users
            .get_mut(&user.id)
            .filter(|u| u.deleted_at.is_none())
            .ok_or(UserError::NotFound(UserLookup::Id(user.id)))?;

        stored.name = user.name;
        stored.email = user.email;
        stored.password_hash = user.password_hash;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        let mut store = self.store.write().await;

        let stored = store
            .users
            .get_mut(&id)
            .filter(|u| u.deleted_at.is_none())
            .ok_or(UserError::NotFound(UserLookup::Id(id)))?;

        let now = Utc::now();
        stored.deleted_at = Some(now);
        stored.updated_at = now;

        Ok(())
    }

    async fn email_retained(&self, email: &str) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store
            .users
            .values()
            .any(|u| u.deleted_at.is_some() && u.email == email))
    }
}
