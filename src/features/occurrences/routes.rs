use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::occurrences::handlers;
use crate::features::occurrences::services::OccurrenceService;

/// Public occurrence routes (no session required)
pub fn routes(service: Arc<OccurrenceService>, body_limit: usize) -> Router {
    Router::new()
        .route(
            "/api/registrar",
            post(handlers::submit_occurrence).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/ocorrencias", get(handlers::list_occurrences))
        .route("/api/estatisticas", get(handlers::get_stats))
        .route("/api/ocorrencia/{id}", get(handlers::get_occurrence))
        .with_state(service)
}
