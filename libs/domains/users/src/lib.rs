//! Users Domain
//!
//! User registration and management over HTTP/JSON.
//!
//! # Features
//!
//! - User CRUD operations with soft delete
//! - Password hashing with Argon2id
//! - Email uniqueness across active users, with a configurable policy for
//!   addresses of deleted users
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, OpenAPI docs
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Email checks, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//!
//! // Serves /users and /users/{id}
//! let router = handlers::router(service);
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use config::{EmailReusePolicy, PasswordHashConfig, UsersConfig};
pub use error::{UserError, UserLookup, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, MessageResponse, NewUser, UpdateUser, User, UserId, UserResponse};
pub use password::Argon2Hasher;
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
