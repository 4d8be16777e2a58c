use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Storage-assigned user key. Always >= 1.
pub type UserId = i64;

/// User entity as stored.
///
/// `password_hash` is an Argon2id PHC string. This type is never serialized
/// outward; handlers respond with [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the user is soft-deleted; such users are invisible to reads
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields the service hands to the repository for insertion.
///
/// Id and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public representation of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: UserId,
    #[schema(example = "Ana")]
    pub name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request body for `POST /users`
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(
        length(min = 1, message = "name must not be empty"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Ana")]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(example = "secret123", min_length = 8, format = Password, write_only)]
    pub password: String,
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request body for `PUT /users/{id}`. Only the name is mutable.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(
        length(min = 1, message = "name must not be empty"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Ana Maria")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, email: &str, password: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_create_user_valid() {
        assert!(create("Ana", "ana@x.com", "secret123").validate().is_ok());
    }

    #[test]
    fn test_create_user_rejects_bad_fields() {
        let errors = create("   ", "not-an-email", "short").validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_password_minimum_is_eight_chars() {
        assert!(create("Ana", "ana@x.com", "1234567").validate().is_err());
        assert!(create("Ana", "ana@x.com", "12345678").validate().is_ok());
    }

    #[test]
    fn test_update_user_rejects_empty_name() {
        let update = UpdateUser {
            name: String::new(),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_create_user_debug_redacts_password() {
        let rendered = format!("{:?}", create("Ana", "ana@x.com", "secret123"));
        assert!(!rendered.contains("secret123"));
    }

    #[test]
    fn test_user_response_has_no_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["id"], 7);
    }
}
