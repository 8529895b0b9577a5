//! Axum router wiring.

use axum::routing::{get, post};
use axum::Router;

use crate::{app_state::AppState, hooks, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/check_event_allowed", post(hooks::check_event_allowed))
        .route(
            "/v1/check_visibility_can_see_event",
            post(hooks::check_visibility_can_see_event),
        )
        .route("/v1/on_new_event", post(hooks::on_new_event))
        .route("/v1/hooks", get(hooks::hooks))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
