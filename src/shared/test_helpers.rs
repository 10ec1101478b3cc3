//! Fixtures shared by the unit and HTTP tests.

use std::path::Path;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::core::config::{
    AppConfig, Config, DatabaseConfig, SeedConfig, SessionConfig, StorageConfig, SwaggerConfig,
};
use crate::core::database::run_migrations;
use crate::core::router::{build_router, Services};
use crate::features::auth::AdminSession;
use crate::features::occurrences::models::OccurrenceStatus;
use crate::modules::storage::LocalStorage;

/// In-memory database with migrations applied.
///
/// A single connection that never expires keeps the database alive for
/// the whole test.
pub async fn test_pool() -> SqlitePool {
    let options = "sqlite::memory:"
        .parse::<SqliteConnectOptions>()
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    pool
}

/// Administrator row with an unusable password hash
pub async fn insert_admin(pool: &SqlitePool, username: &str, display_name: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO administrators (username, password_hash, display_name, email, created_at)
        VALUES (?, 'not-a-hash', ?, NULL, ?)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(display_name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Pending occurrence without attachment
pub async fn insert_occurrence(pool: &SqlitePool, title: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO occurrences (title, description, category, attachment, status, created_at)
        VALUES (?, 'Descrição de teste', 'Geral', NULL, ?, ?)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(OccurrenceStatus::Pending)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_response(pool: &SqlitePool, occurrence_id: i64, admin_id: i64, message: &str) {
    sqlx::query(
        r#"
        INSERT INTO responses (occurrence_id, administrator_id, message, attachment, created_at)
        VALUES (?, ?, ?, NULL, ?)
        "#,
    )
    .bind(occurrence_id)
    .bind(admin_id)
    .bind(message)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();
}

fn storage_config(dir: &Path) -> StorageConfig {
    StorageConfig {
        upload_dir: dir.to_path_buf(),
        public_path: "/uploads".to_string(),
        max_upload_size: 1024 * 1024,
    }
}

/// Attachment storage in a fresh temporary directory
pub fn test_storage() -> (LocalStorage, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(&storage_config(dir.path()));
    (storage, dir)
}

pub fn test_seed_config() -> SeedConfig {
    SeedConfig {
        admin_username: "admin".to_string(),
        admin_password: "admin123".to_string(),
        admin_display_name: "Administrador Principal".to_string(),
        admin_email: Some("admin@sio.com".to_string()),
    }
}

pub fn admin_session(admin_id: i64, username: &str, display_name: &str) -> AdminSession {
    AdminSession {
        token: "test-token".to_string(),
        admin_id,
        username: username.to_string(),
        display_name: display_name.to_string(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 2 * 1024 * 1024,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        },
        session: SessionConfig {
            ttl: Duration::from_secs(3600),
            ..SessionConfig::default()
        },
        storage: storage_config(upload_dir),
        seed: test_seed_config(),
        swagger: SwaggerConfig {
            username: None,
            password: None,
            title: "SIO API".to_string(),
            version: "test".to_string(),
            description: "test".to_string(),
        },
    }
}

/// Full application served in memory, with the default administrator seeded
pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = test_pool().await;
        let upload_dir = tempfile::tempdir().unwrap();
        let config = test_config(upload_dir.path());

        let services = Services::new(pool.clone(), &config);
        services
            .auth
            .ensure_default_admin(&config.seed)
            .await
            .unwrap();

        let server = TestServer::new(build_router(&config, &services)).unwrap();

        Self {
            server,
            pool,
            upload_dir,
        }
    }

    /// Log in as the seeded administrator and return the session token
    pub async fn login(&self) -> String {
        let seed = test_seed_config();
        let response = self
            .server
            .post("/admin/login")
            .json(&json!({ "usuario": seed.admin_username, "senha": seed.admin_password }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        body["data"]["token"].as_str().unwrap().to_string()
    }
}
