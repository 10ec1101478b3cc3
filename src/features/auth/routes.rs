use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Login/logout routes (no session required)
pub fn routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/admin/login", post(handlers::login))
        .route("/admin/logout", get(handlers::logout))
        .with_state(service)
}
