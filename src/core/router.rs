use std::sync::Arc;

use axum::{http::StatusCode, middleware::from_fn, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::auth::{routes as auth_routes, AuthService, SessionStore};
use crate::features::files::routes as files_routes;
use crate::features::occurrences::{routes as occurrences_routes, OccurrenceService};
use crate::features::status::StatusService;
use crate::modules::storage::LocalStorage;

/// Services shared by the HTTP layer
pub struct Services {
    pub sessions: Arc<SessionStore>,
    pub storage: Arc<LocalStorage>,
    pub auth: Arc<AuthService>,
    pub occurrences: Arc<OccurrenceService>,
    pub admin: Arc<AdminService>,
}

impl Services {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        let sessions = Arc::new(SessionStore::new(&config.session));
        let storage = Arc::new(LocalStorage::new(&config.storage));

        let auth = Arc::new(AuthService::new(pool.clone(), Arc::clone(&sessions)));
        let occurrences = Arc::new(OccurrenceService::new(pool.clone(), Arc::clone(&storage)));
        let status = Arc::new(StatusService::new(pool.clone()));
        let admin = Arc::new(AdminService::new(
            pool,
            Arc::clone(&occurrences),
            status,
        ));

        Self {
            sessions,
            storage,
            auth,
            occurrences,
            admin,
        }
    }
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "health"
)]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Build the application router with every route and layer attached
pub fn build_router(config: &Config, services: &Services) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Admin API (requires an administrator session)
    let admin_api = admin_routes::routes(
        Arc::clone(&services.admin),
        config.app.max_request_body_size,
    )
    .route_layer(axum::middleware::from_fn_with_state(
        Arc::clone(&services.sessions),
        middleware::session_middleware,
    ));

    // Public routes (no session required)
    let public_routes = Router::new()
        .merge(occurrences_routes::routes(
            Arc::clone(&services.occurrences),
            config.app.max_request_body_size,
        ))
        .merge(auth_routes::routes(Arc::clone(&services.auth)))
        .merge(files_routes::routes(&services.storage))
        .route("/health", get(health_check));

    Router::new()
        .merge(swagger)
        .nest("/admin/api", admin_api)
        .merge(public_routes)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
