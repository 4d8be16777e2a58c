use axum::Router;
use domain_users::{PgUserRepository, UserService, handlers};

use crate::state::AppState;

/// Users routes backed by PostgreSQL.
pub fn router(state: &AppState) -> eyre::Result<Router> {
    let repository = PgUserRepository::new(state.db.clone());
    let service = UserService::with_config(repository, &state.config.users)
        .map_err(|e| eyre::eyre!("Invalid users configuration: {}", e))?;

    Ok(handlers::router(service))
}
