use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::common::DatabaseError;

/// Verify the pool can reach PostgreSQL.
///
/// Backs the `/ready` endpoint; a failure means the instance should be taken
/// out of rotation, not restarted.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    db.ping()
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("PostgreSQL ping failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_check_health_on_mock_connection() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        assert!(check_health(&db).await.is_ok());
    }
}
