pub mod docs;
pub mod extract;
pub mod health;
pub mod interview;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{auth::require_identity, rate_limit};
use crate::AppState;

pub fn router(state: AppState, api_rps: u32) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(docs::openapi));

    let interview_api = Router::new()
        .route(
            "/api/interviews",
            get(interview::list_interviews).post(interview::create_interview),
        )
        .route(
            "/api/interviews/:id",
            get(interview::get_interview)
                .patch(interview::update_interview)
                .delete(interview::delete_interview),
        )
        .route("/api/interviews/:id/stages", post(interview::append_stage))
        .route(
            "/api/interviews/:id/stages/:index",
            put(interview::update_stage).delete(interview::remove_stage),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(api_rps),
            rate_limit::rps_middleware,
        ));

    base_routes
        .merge(interview_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
