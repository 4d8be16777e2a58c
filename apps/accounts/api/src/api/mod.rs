use axum::{Router, routing::get};
use axum_helpers::{health_router, ping_router};

pub mod health;
pub mod users;

use crate::state::AppState;

/// All application routes, before `create_router` adds docs and middleware.
///
/// Liveness and readiness endpoints are included here so they pass through
/// the same layers as the API.
pub fn routes(state: &AppState) -> eyre::Result<Router> {
    Ok(Router::new()
        .merge(users::router(state)?)
        .merge(health_router(state.config.app))
        .merge(ping_router())
        .merge(ready_router(state.clone())))
}

/// `/ready` with the state applied, so it merges into the stateless router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
