use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::config::SeedConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AdminSession, Administrator, CreateAdministrator};
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::session::SessionStore;

/// Service for administrator authentication (login, logout, seeding)
pub struct AuthService {
    pool: SqlitePool,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(pool: SqlitePool, sessions: Arc<SessionStore>) -> Self {
        Self { pool, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Check credentials and open a session
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminSession> {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let admin = self.find_by_username(username).await?;

        let valid = match &admin {
            Some(admin) => {
                verify_password(password.to_string(), admin.password_hash.clone()).await?
            }
            None => false,
        };

        let admin = match admin {
            Some(admin) if valid => admin,
            _ => {
                tracing::warn!("Failed login attempt for username '{}'", username);
                return Err(AppError::Unauthorized(
                    "Invalid username or password".to_string(),
                ));
            }
        };

        let session = self.sessions.create(&admin).await;
        tracing::info!("Administrator {} ({}) logged in", admin.username, admin.id);

        Ok(session)
    }

    /// End the session identified by `token`. Unknown tokens are ignored.
    pub async fn logout(&self, token: Option<&str>) {
        if let Some(token) = token {
            if self.sessions.remove(token).await {
                tracing::info!("Administrator session ended");
            }
        }
    }

    /// Create the default administrator when none exist yet.
    ///
    /// Returns the id of the created account, or `None` if the table
    /// already had rows.
    pub async fn ensure_default_admin(&self, seed: &SeedConfig) -> Result<Option<i64>> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM administrators")
            .fetch_one(&self.pool)
            .await?;

        if count > 0 {
            return Ok(None);
        }

        let password_hash = hash_password(seed.admin_password.clone()).await?;
        let id = self
            .create_admin(CreateAdministrator {
                username: seed.admin_username.clone(),
                password_hash,
                display_name: seed.admin_display_name.clone(),
                email: seed.admin_email.clone(),
            })
            .await?;

        tracing::info!(
            "Default administrator '{}' created (id {})",
            seed.admin_username,
            id
        );

        Ok(Some(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Administrator>> {
        sqlx::query_as::<_, Administrator>(
            r#"
            SELECT id, username, password_hash, display_name, email, created_at
            FROM administrators
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch administrator: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn create_admin(&self, data: CreateAdministrator) -> Result<i64> {
        sqlx::query_scalar(
            r#"
            INSERT INTO administrators (username, password_hash, display_name, email, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(&data.display_name)
        .bind(&data.email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create administrator: {:?}", e);
            AppError::Database(e)
        })
    }
}
