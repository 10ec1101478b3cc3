use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for administrator
#[derive(Debug, Clone, FromRow)]
pub struct Administrator {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new administrator
#[derive(Debug, Clone)]
pub struct CreateAdministrator {
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// An authenticated administrator session.
///
/// Created by a successful login and handed to every admin operation;
/// holding one is what authorizes the caller.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub admin_id: i64,
    pub username: String,
    pub display_name: String,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
