use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{self, AppState};

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route("/healthz", get(api::healthz))
        .route(
            "/api/assessments",
            get(api::list_assessments).post(api::create_assessment),
        )
        .route("/api/assessments/{id}", get(api::get_assessment))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
