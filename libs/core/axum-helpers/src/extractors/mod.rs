//! Custom extractors for Axum handlers.
//!
//! Both reject with [`AppError`](crate::errors::AppError) so malformed input
//! is reported in the standard error envelope before a handler runs.

pub mod id_path;
pub mod validated_json;

pub use id_path::{IdPath, parse_id};
pub use validated_json::ValidatedJson;
