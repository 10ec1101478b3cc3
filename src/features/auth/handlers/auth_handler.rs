use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto};
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;

/// Log in as an administrator
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<impl IntoResponse> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = service.login(&dto.username, &dto.password).await?;
    let cookie = service.sessions().session_cookie(&session);

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(ApiResponse::success(
            Some(LoginResponseDto::from(session)),
            Some("Login successful".to_string()),
            None,
        )),
    ))
}

/// End the current administrator session
#[utoipa::path(
    get,
    path = "/admin/logout",
    responses(
        (status = 200, description = "Session cleared", body = ApiResponse<serde_json::Value>)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = service.sessions().token_from_headers(&headers);
    service.logout(token.as_deref()).await;

    (
        AppendHeaders([(header::SET_COOKIE, service.sessions().expired_cookie())]),
        Json(ApiResponse::<()>::success(
            None,
            Some("Logged out".to_string()),
            None,
        )),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue, StatusCode};
    use serde_json::{json, Value};

    use crate::shared::test_helpers::TestApp;

    #[tokio::test]
    async fn test_login_returns_summary_and_cookie() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/admin/login")
            .json(&json!({ "usuario": "admin", "senha": "admin123" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("sio_session="));
        assert!(cookie.contains("HttpOnly"));

        let body: Value = response.json();
        assert_eq!(body["data"]["admin"]["username"], "admin");
        assert_eq!(
            body["data"]["admin"]["display_name"],
            "Administrador Principal"
        );
        assert_eq!(body["data"]["token_type"], "Bearer");
    }

    #[tokio::test]
    async fn test_login_missing_fields_is_400() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/admin/login")
            .json(&json!({ "usuario": "admin" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_401() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/admin/login")
            .json(&json!({ "username": "admin", "password": "wrong" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/admin/login")
            .content_type("application/json")
            .bytes("{not json".into())
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let app = TestApp::new().await;
        let token = app.login().await;

        app.server
            .get("/admin/api/estatisticas")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let logout = app
            .server
            .get("/admin/logout")
            .add_header(
                header::COOKIE,
                HeaderValue::from_str(&format!("sio_session={}", token)).unwrap(),
            )
            .await;
        assert_eq!(logout.status_code(), StatusCode::OK);
        assert!(logout
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .contains("Max-Age=0"));

        app.server
            .get("/admin/api/estatisticas")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_session_still_succeeds() {
        let app = TestApp::new().await;

        app.server.get("/admin/logout").await.assert_status_ok();
    }
}
