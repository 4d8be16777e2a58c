//! Shared application state passed to route constructors.

use database::postgres::DatabaseConnection;

/// Cloned into every router that needs it; the connection is a pooled handle,
/// so clones share one pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
