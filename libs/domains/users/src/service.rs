use std::sync::Arc;

use crate::config::{EmailReusePolicy, UsersConfig};
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, NewUser, UpdateUser, User, UserId};
use crate::password::Argon2Hasher;
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    hasher: Argon2Hasher,
    email_reuse: EmailReusePolicy,
}

impl<R: UserRepository> UserService<R> {
    /// Service with default Argon2 cost and [`EmailReusePolicy::Retain`]
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher: Argon2Hasher::default(),
            email_reuse: EmailReusePolicy::default(),
        }
    }

    /// Fails if the configured hash parameters are rejected by Argon2.
    pub fn with_config(repository: R, config: &UsersConfig) -> UserResult<Self> {
        Ok(Self {
            repository: Arc::new(repository),
            hasher: Argon2Hasher::new(&config.password_hash)?,
            email_reuse: config.email_reuse,
        })
    }

    /// Register a new user.
    ///
    /// Input shape is validated by the caller. The email probe only produces
    /// a friendly error; the unique index decides, and a constraint failure
    /// on insert is reported as `EmailExists` too.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        match self.repository.find_by_email(&input.email).await {
            Ok(_) => return Err(UserError::EmailExists(input.email)),
            Err(UserError::NotFound(_)) => {}
            Err(e) => {
                return Err(UserError::Internal(format!(
                    "email availability check failed: {}",
                    e
                )));
            }
        }

        if self.email_reuse == EmailReusePolicy::Retain
            && self.repository.email_retained(&input.email).await?
        {
            return Err(UserError::EmailExists(input.email));
        }

        let CreateUser {
            name,
            email,
            password,
        } = input;
        let password_hash = self.hasher.hash(password).await?;

        let new_user = NewUser {
            name,
            email: email.clone(),
            password_hash,
        };

        match self.repository.create(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Created user");
                Ok(user)
            }
            Err(UserError::ConstraintViolation(detail)) => {
                tracing::warn!(%detail, "Concurrent registration for the same email");
                Err(UserError::EmailExists(email))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_all_users(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    pub async fn get_user_by_id(&self, id: UserId) -> UserResult<User> {
        self.repository.find_by_id(id).await
    }

    /// Rename a user. No other field changes through this path.
    pub async fn update_user(&self, id: UserId, input: UpdateUser) -> UserResult<User> {
        let mut user = self.repository.find_by_id(id).await?;
        user.name = input.name;

        let updated = self.repository.update(user).await?;
        tracing::info!(user_id = id, "Updated user");
        Ok(updated)
    }

    pub async fn delete_user(&self, id: UserId) -> UserResult<()> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordHashConfig;
    use crate::error::UserLookup;
    use crate::repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn cheap_config(email_reuse: EmailReusePolicy) -> UsersConfig {
        UsersConfig {
            password_hash: PasswordHashConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
            email_reuse,
        }
    }

    fn service(repo: MockUserRepository) -> UserService<MockUserRepository> {
        UserService::with_config(repo, &cheap_config(EmailReusePolicy::Retain)).unwrap()
    }

    fn stored(id: UserId, name: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn ana() -> CreateUser {
        CreateUser {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: "secret123".to_string(),
        }
    }

    fn email_unused(repo: &mut MockUserRepository) {
        repo.expect_find_by_email()
            .returning(|email| Err(UserError::NotFound(UserLookup::Email(email.to_string()))));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut repo = MockUserRepository::new();
        email_unused(&mut repo);
        repo.expect_email_retained()
            .withf(|email| email == "ana@x.com")
            .returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_user| {
                new_user.password_hash.starts_with("$argon2id$")
                    && !new_user.password_hash.contains("secret123")
            })
            .times(1)
            .returning(|new_user| {
                let mut user = stored(1, &new_user.name, &new_user.email);
                user.password_hash = new_user.password_hash;
                Ok(user)
            });

        let user = service(repo).create_user(ana()).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_create_user_existing_email_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(stored(4, "Someone", email)));
        repo.expect_create().never();

        let result = service(repo).create_user(ana()).await;
        assert!(matches!(result, Err(UserError::EmailExists(email)) if email == "ana@x.com"));
    }

    #[tokio::test]
    async fn test_create_user_probe_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(UserError::Internal("pool timed out".to_string())));
        repo.expect_create().never();

        let result = service(repo).create_user(ana()).await;
        assert!(matches!(result, Err(UserError::Internal(_))));
    }

    #[tokio::test]
    async fn test_create_user_race_maps_to_email_exists() {
        let mut repo = MockUserRepository::new();
        email_unused(&mut repo);
        repo.expect_email_retained().returning(|_| Ok(false));
        repo.expect_create().returning(|_| {
            Err(UserError::ConstraintViolation(
                "uq_users_email_active".to_string(),
            ))
        });

        let result = service(repo).create_user(ana()).await;
        assert!(matches!(result, Err(UserError::EmailExists(_))));
    }

    #[tokio::test]
    async fn test_create_user_retained_email_conflicts() {
        let mut repo = MockUserRepository::new();
        email_unused(&mut repo);
        repo.expect_email_retained().returning(|_| Ok(true));
        repo.expect_create().never();

        let result = service(repo).create_user(ana()).await;
        assert!(matches!(result, Err(UserError::EmailExists(_))));
    }

    #[tokio::test]
    async fn test_create_user_release_policy_skips_retained_check() {
        let mut repo = MockUserRepository::new();
        email_unused(&mut repo);
        repo.expect_email_retained().never();
        repo.expect_create()
            .returning(|new_user| Ok(stored(2, &new_user.name, &new_user.email)));

        let service =
            UserService::with_config(repo, &cheap_config(EmailReusePolicy::Release)).unwrap();

        assert!(service.create_user(ana()).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_user_by_id_propagates_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(11))
            .returning(|id| Err(UserError::NotFound(UserLookup::Id(id))));

        let result = service(repo).get_user_by_id(11).await;
        assert!(matches!(result, Err(UserError::NotFound(UserLookup::Id(11)))));
    }

    #[tokio::test]
    async fn test_update_user_changes_only_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(stored(id, "Ana", "ana@x.com")));
        repo.expect_update()
            .withf(|user| {
                user.id == 3
                    && user.name == "Ana Maria"
                    && user.email == "ana@x.com"
                    && user.password_hash == "hash"
            })
            .returning(Ok);

        let updated = service(repo)
            .update_user(
                3,
                UpdateUser {
                    name: "Ana Maria".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_update_missing_user_does_not_write() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Err(UserError::NotFound(UserLookup::Id(id))));
        repo.expect_update().never();

        let result = service(repo)
            .update_user(
                8,
                UpdateUser {
                    name: "X".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_passes_through() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().with(eq(5)).times(1).returning(|_| Ok(()));

        assert!(service(repo).delete_user(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_all_users_passes_through() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(vec![stored(1, "Ana", "ana@x.com")]));

        let users = service(repo).get_all_users().await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_with_config_rejects_bad_cost() {
        let mut config = cheap_config(EmailReusePolicy::Retain);
        config.password_hash.iterations = 0;

        let result = UserService::with_config(MockUserRepository::new(), &config);
        assert!(matches!(result, Err(UserError::PasswordHash(_))));
    }
}
