use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::core::router;
use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::occurrences::{
    dtos as occurrences_dtos, handlers as occurrences_handlers, models as occurrences_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        router::health_check,
        // Occurrences (public)
        occurrences_handlers::submit_occurrence,
        occurrences_handlers::list_occurrences,
        occurrences_handlers::get_stats,
        occurrences_handlers::get_occurrence,
        // Auth
        auth::handlers::login,
        auth::handlers::logout,
        // Admin
        admin_handlers::get_stats,
        admin_handlers::list_occurrences,
        admin_handlers::get_occurrence,
        admin_handlers::update_status,
        admin_handlers::respond,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Occurrences
            occurrences_models::OccurrenceStatus,
            occurrences_dtos::SubmitOccurrenceDto,
            occurrences_dtos::OccurrenceDto,
            occurrences_dtos::ResponseDto,
            occurrences_dtos::OccurrenceDetailDto,
            occurrences_dtos::CreatedIdDto,
            occurrences_dtos::CategoryCountDto,
            occurrences_dtos::OccurrenceStatsDto,
            ApiResponse<occurrences_dtos::CreatedIdDto>,
            ApiResponse<Vec<occurrences_dtos::OccurrenceDto>>,
            ApiResponse<occurrences_dtos::OccurrenceDetailDto>,
            ApiResponse<occurrences_dtos::OccurrenceStatsDto>,
            // Auth
            auth::dtos::LoginRequestDto,
            auth::dtos::LoginResponseDto,
            auth::dtos::AdminSummaryDto,
            ApiResponse<auth::dtos::LoginResponseDto>,
            // Admin
            admin_dtos::AdminStatsDto,
            admin_dtos::AdminOccurrenceDto,
            admin_dtos::AdminOccurrenceDetailDto,
            admin_dtos::StatusChangeDto,
            admin_dtos::UpdateStatusDto,
            admin_dtos::StatusChangeResultDto,
            admin_dtos::RespondDto,
            ApiResponse<admin_dtos::AdminStatsDto>,
            ApiResponse<Vec<admin_dtos::AdminOccurrenceDto>>,
            ApiResponse<admin_dtos::AdminOccurrenceDetailDto>,
            ApiResponse<admin_dtos::StatusChangeResultDto>,
        )
    ),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "occurrences", description = "Public occurrence submission and queries"),
        (name = "auth", description = "Administrator login and logout"),
        (name = "admin", description = "Occurrence management (administrator session required)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "SIO API",
        version = "0.1.0",
        description = "API documentation for the SIO occurrence service",
    )
)]
pub struct ApiDoc;

/// Adds the administrator session security schemes to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("sio_session"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
