use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppPath;
use crate::features::occurrences::dtos::{
    CreatedIdDto, OccurrenceDetailDto, OccurrenceDto, OccurrenceStatsDto, SubmitOccurrenceDto,
};
use crate::features::occurrences::services::OccurrenceService;
use crate::shared::multipart::FormData;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a new occurrence
///
/// Accepts multipart/form-data with `titulo`/`title`, `descricao`/`description`,
/// `categoria`/`category` (all required) and an optional `anexo`/`attachment` file.
#[utoipa::path(
    post,
    path = "/api/registrar",
    request_body(
        content = SubmitOccurrenceDto,
        content_type = "multipart/form-data",
        description = "Occurrence form with optional attachment",
    ),
    responses(
        (status = 201, description = "Occurrence registered", body = ApiResponse<CreatedIdDto>),
        (status = 400, description = "Required field missing or invalid attachment")
    ),
    tag = "occurrences"
)]
pub async fn submit_occurrence(
    State(service): State<Arc<OccurrenceService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<CreatedIdDto>>)> {
    let mut form = FormData::read(&mut multipart).await?;

    let id = service
        .submit(
            form.text(&["titulo", "title"]),
            form.text(&["descricao", "description"]),
            form.text(&["categoria", "category"]),
            form.take_file(&["anexo", "attachment"]),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(CreatedIdDto { id }),
            Some("Occurrence registered successfully".to_string()),
            None,
        )),
    ))
}

/// List all occurrences, newest first
#[utoipa::path(
    get,
    path = "/api/ocorrencias",
    responses(
        (status = 200, description = "List of occurrences", body = ApiResponse<Vec<OccurrenceDto>>)
    ),
    tag = "occurrences"
)]
pub async fn list_occurrences(
    State(service): State<Arc<OccurrenceService>>,
) -> Result<Json<ApiResponse<Vec<OccurrenceDto>>>> {
    let occurrences = service.list_all().await?;
    let meta = Meta {
        total: occurrences.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(occurrences), None, Some(meta))))
}

/// Occurrence totals per category
#[utoipa::path(
    get,
    path = "/api/estatisticas",
    responses(
        (status = 200, description = "Occurrence statistics", body = ApiResponse<OccurrenceStatsDto>)
    ),
    tag = "occurrences"
)]
pub async fn get_stats(
    State(service): State<Arc<OccurrenceService>>,
) -> Result<Json<ApiResponse<OccurrenceStatsDto>>> {
    let stats = service.stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Get an occurrence with its responses
#[utoipa::path(
    get,
    path = "/api/ocorrencia/{id}",
    params(
        ("id" = i64, Path, description = "Occurrence ID")
    ),
    responses(
        (status = 200, description = "Occurrence details", body = ApiResponse<OccurrenceDetailDto>),
        (status = 404, description = "Occurrence not found")
    ),
    tag = "occurrences"
)]
pub async fn get_occurrence(
    State(service): State<Arc<OccurrenceService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<OccurrenceDetailDto>>> {
    let detail = service.get_detail(id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::Value;

    use crate::shared::test_helpers::TestApp;

    fn form(title: &str, description: &str, category: &str) -> MultipartForm {
        MultipartForm::new()
            .add_text("titulo", title)
            .add_text("descricao", description)
            .add_text("categoria", category)
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/api/registrar")
            .multipart(form("Broken light", "Light pole down", "Infrastructure"))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);

        let list: Value = app.server.get("/api/ocorrencias").await.json();
        assert_eq!(list["meta"]["total"], 1);
        assert_eq!(list["data"][0]["title"], "Broken light");
        assert_eq!(list["data"][0]["status"], "Pendente");
        assert!(list["data"][0]["attachment_url"].is_null());
    }

    #[tokio::test]
    async fn test_submit_missing_field_is_rejected() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/api/registrar")
            .multipart(
                MultipartForm::new()
                    .add_text("titulo", "Sem categoria")
                    .add_text("descricao", "Falta a categoria"),
            )
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("category"));

        let list: Value = app.server.get("/api/ocorrencias").await.json();
        assert_eq!(list["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_submit_with_english_names_and_attachment() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/api/registrar")
            .multipart(
                MultipartForm::new()
                    .add_text("title", "Buraco")
                    .add_text("description", "Buraco enorme")
                    .add_text("category", "Vias")
                    .add_part(
                        "attachment",
                        Part::bytes(b"fake-png".to_vec())
                            .file_name("buraco.png")
                            .mime_type("image/png"),
                    ),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let detail: Value = app.server.get("/api/ocorrencia/1").await.json();
        let url = detail["data"]["occurrence"]["attachment_url"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("_buraco.png"));

        let file = app.server.get(&url).await;
        assert_eq!(file.status_code(), StatusCode::OK);
        assert_eq!(file.as_bytes().as_ref(), b"fake-png");
    }

    #[tokio::test]
    async fn test_empty_file_part_means_no_attachment() {
        let app = TestApp::new().await;

        app.server
            .post("/api/registrar")
            .multipart(
                form("Poste", "Apagado", "Iluminação").add_part(
                    "anexo",
                    Part::bytes(Vec::<u8>::new())
                        .file_name("")
                        .mime_type("application/octet-stream"),
                ),
            )
            .await
            .assert_status(StatusCode::CREATED);

        let detail: Value = app.server.get("/api/ocorrencia/1").await.json();
        assert!(detail["data"]["occurrence"]["attachment_url"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_occurrence_is_404() {
        let app = TestApp::new().await;

        let response = app.server.get("/api/ocorrencia/999").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_non_numeric_id_uses_error_envelope() {
        let app = TestApp::new().await;

        let response = app.server.get("/api/ocorrencia/abc").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Invalid path parameter"));
    }

    #[tokio::test]
    async fn test_public_stats() {
        let app = TestApp::new().await;
        for category in ["Vias", "Vias", "Limpeza"] {
            app.server
                .post("/api/registrar")
                .multipart(form("t", "d", category))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let stats: Value = app.server.get("/api/estatisticas").await.json();

        assert_eq!(stats["data"]["total"], 3);
        assert_eq!(stats["data"]["total_categories"], 2);
        assert_eq!(stats["data"]["categories"][0]["category"], "Vias");
        assert_eq!(stats["data"]["categories"][0]["count"], 2);
    }

    #[tokio::test]
    async fn test_health_and_request_id() {
        let app = TestApp::new().await;

        let response = app.server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
