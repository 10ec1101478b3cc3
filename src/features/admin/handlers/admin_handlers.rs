use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::auth::AdminSession;
use crate::features::occurrences::dtos::CreatedIdDto;
use crate::shared::multipart::FormData;
use crate::shared::types::{ApiResponse, Meta};

/// Occurrence counts by status
#[utoipa::path(
    get,
    path = "/admin/api/estatisticas",
    responses(
        (status = 200, description = "Admin statistics", body = ApiResponse<AdminStatsDto>),
        (status = 401, description = "No valid administrator session")
    ),
    tag = "admin",
    security(("session_auth" = []))
)]
pub async fn get_stats(
    session: AdminSession,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<AdminStatsDto>>> {
    let stats = service.stats(&session).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// List occurrences with response counts
#[utoipa::path(
    get,
    path = "/admin/api/ocorrencias",
    responses(
        (status = 200, description = "List of occurrences", body = ApiResponse<Vec<AdminOccurrenceDto>>),
        (status = 401, description = "No valid administrator session")
    ),
    tag = "admin",
    security(("session_auth" = []))
)]
pub async fn list_occurrences(
    session: AdminSession,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<AdminOccurrenceDto>>>> {
    let items = service.list_all(&session).await?;
    let meta = Meta {
        total: items.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}

/// Occurrence with responses and status history
#[utoipa::path(
    get,
    path = "/admin/api/ocorrencias/{id}",
    params(
        ("id" = i64, Path, description = "Occurrence ID")
    ),
    responses(
        (status = 200, description = "Occurrence details", body = ApiResponse<AdminOccurrenceDetailDto>),
        (status = 401, description = "No valid administrator session"),
        (status = 404, description = "Occurrence not found")
    ),
    tag = "admin",
    security(("session_auth" = []))
)]
pub async fn get_occurrence(
    session: AdminSession,
    State(service): State<Arc<AdminService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<AdminOccurrenceDetailDto>>> {
    let detail = service.get_detail(&session, id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Change an occurrence's status
#[utoipa::path(
    put,
    path = "/admin/api/ocorrencias/{id}/status",
    params(
        ("id" = i64, Path, description = "Occurrence ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<StatusChangeResultDto>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "No valid administrator session"),
        (status = 404, description = "Occurrence not found"),
        (status = 409, description = "Status changed concurrently")
    ),
    tag = "admin",
    security(("session_auth" = []))
)]
pub async fn update_status(
    session: AdminSession,
    State(service): State<Arc<AdminService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<StatusChangeResultDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.set_status(&session, id, &dto.status).await?;
    let message = format!(
        "Status changed from {} to {}",
        result.previous_status, result.new_status
    );
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}

/// Respond to an occurrence
///
/// Accepts multipart/form-data with `ocorrencia_id`, `mensagem` and an
/// optional `anexo` file. A Pending occurrence moves to "Em Andamento".
#[utoipa::path(
    post,
    path = "/admin/api/responder",
    request_body(
        content = RespondDto,
        content_type = "multipart/form-data",
        description = "Response form with optional attachment",
    ),
    responses(
        (status = 201, description = "Response posted", body = ApiResponse<CreatedIdDto>),
        (status = 400, description = "Occurrence id or message missing"),
        (status = 401, description = "No valid administrator session"),
        (status = 404, description = "Occurrence not found")
    ),
    tag = "admin",
    security(("session_auth" = []))
)]
pub async fn respond(
    session: AdminSession,
    State(service): State<Arc<AdminService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<CreatedIdDto>>)> {
    let mut form = FormData::read(&mut multipart).await?;

    let id = service
        .respond(
            &session,
            form.text(&["ocorrencia_id", "occurrence_id"]),
            form.text(&["mensagem", "message"]),
            form.take_file(&["anexo", "attachment"]),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(CreatedIdDto { id }),
            Some("Response posted successfully".to_string()),
            None,
        )),
    ))
}
