//! Route definitions.

use crate::{auth, handlers, state::AppState};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tasktrack_core::TrackerConfig;
use tower_http::trace::TraceLayer;

/// Fixed routes; the configurable token endpoint may not shadow them.
pub const FIXED_ROUTES: &[&str] = &["/healthz", "/reg", "/add_task", "/tasks", "/mark_done"];

/// Reject a token endpoint that collides with a fixed route.
pub fn check_token_route(config: &TrackerConfig) -> anyhow::Result<()> {
    let route = config.auth.token_route();
    if FIXED_ROUTES.contains(&route.as_str()) {
        anyhow::bail!("auth.token_url '{route}' collides with a built-in route");
    }
    Ok(())
}

/// Build the full router. The token endpoint path comes from `auth.token_url`.
pub fn create_router(state: AppState) -> Router {
    let token_route = state.config.auth.token_route();

    let protected = Router::new()
        .route("/add_task", post(handlers::add_task))
        .route("/tasks", get(handlers::list_tasks))
        .route("/mark_done", put(handlers::mark_done))
        .route_layer(middleware::from_fn(auth::require_bearer));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/reg", post(handlers::register))
        .route(&token_route, post(handlers::token))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
