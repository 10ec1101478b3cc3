use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AdminSession;

/// Request DTO for administrator login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[serde(rename = "usuario", alias = "username", default)]
    #[validate(length(max = 100, message = "Username must be at most 100 characters"))]
    pub username: String,

    #[serde(rename = "senha", alias = "password", default)]
    pub password: String,
}

/// Administrator summary returned after login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminSummaryDto {
    pub id: i64,
    pub username: String,
    pub display_name: String,
}

/// Response DTO for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// Session token, also sent as the session cookie
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub admin: AdminSummaryDto,
}

impl From<AdminSession> for LoginResponseDto {
    fn from(session: AdminSession) -> Self {
        Self {
            token: session.token,
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
            admin: AdminSummaryDto {
                id: session.admin_id,
                username: session.username,
                display_name: session.display_name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_accepts_both_field_names() {
        let pt: LoginRequestDto =
            serde_json::from_str(r#"{"usuario":"admin","senha":"admin123"}"#).unwrap();
        let en: LoginRequestDto =
            serde_json::from_str(r#"{"username":"admin","password":"admin123"}"#).unwrap();

        assert_eq!(pt.username, en.username);
        assert_eq!(pt.password, en.password);
    }

    #[test]
    fn test_login_request_missing_fields_default_to_empty() {
        let dto: LoginRequestDto = serde_json::from_str("{}").unwrap();
        assert!(dto.username.is_empty());
        assert!(dto.password.is_empty());
    }
}
