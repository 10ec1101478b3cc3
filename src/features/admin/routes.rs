use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes (all require an administrator session)
pub fn routes(admin_service: Arc<AdminService>, body_limit: usize) -> Router {
    Router::new()
        .route("/estatisticas", get(handlers::get_stats))
        .route("/ocorrencias", get(handlers::list_occurrences))
        .route("/ocorrencias/{id}", get(handlers::get_occurrence))
        .route("/ocorrencias/{id}/status", put(handlers::update_status))
        .route(
            "/responder",
            post(handlers::respond).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(admin_service)
}
