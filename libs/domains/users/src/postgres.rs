use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Select, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserLookup, UserResult},
    models::{NewUser, User, UserId},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn active() -> Select<entity::Entity> {
        entity::Entity::find().filter(entity::Column::DeletedAt.is_null())
    }
}

fn map_db_err(err: DbErr) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => UserError::ConstraintViolation(detail),
        _ => UserError::Internal(format!("Database error: {}", err)),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let model = entity::ActiveModel {
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        tracing::debug!(user_id = model.id, "Inserted user row");
        Ok(model.into())
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let models = Self::active()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: UserId) -> UserResult<User> {
        Self::active()
            .filter(entity::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(Into::into)
            .ok_or(UserError::NotFound(UserLookup::Id(id)))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<User> {
        Self::active()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(Into::into)
            .ok_or_else(|| UserError::NotFound(UserLookup::Email(email.to_string())))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let id = user.id;
        let changes = entity::ActiveModel {
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            ..Default::default()
        };

        // updated_at is maintained by the users_touch_updated_at trigger
        let mut rows = entity::Entity::update_many()
            .set(changes)
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::DeletedAt.is_null())
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.pop()
            .map(Into::into)
            .ok_or(UserError::NotFound(UserLookup::Id(id)))
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        let result = entity::Entity::update_many()
            .set(entity::ActiveModel {
                deleted_at: Set(Some(Utc::now().into())),
                ..Default::default()
            })
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(UserLookup::Id(id)));
        }

        Ok(())
    }

    async fn email_retained(&self, email: &str) -> UserResult<bool> {
        let retained = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .filter(entity::Column::DeletedAt.is_not_null())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .is_some();

        Ok(retained)
    }
}
