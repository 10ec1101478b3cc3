//! In-memory store of administrator sessions.
//!
//! Tokens are random v4 UUIDs presented either as
//! `Authorization: Bearer <token>` or through the session cookie.

use std::collections::HashMap;
use std::time::Duration;

use axum::http::{header, HeaderMap};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::config::SessionConfig;
use crate::features::auth::model::{AdminSession, Administrator};

pub struct SessionStore {
    sessions: RwLock<HashMap<String, AdminSession>>,
    ttl: Duration,
    cookie_name: String,
    cookie_secure: bool,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: config.ttl,
            cookie_name: config.cookie_name.clone(),
            cookie_secure: config.cookie_secure,
        }
    }

    /// Open a new session for an administrator
    pub async fn create(&self, admin: &Administrator) -> AdminSession {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::hours(8));

        let session = AdminSession {
            token: Uuid::new_v4().simple().to_string(),
            admin_id: admin.id,
            username: admin.username.clone(),
            display_name: admin.display_name.clone(),
            expires_at: now + ttl,
        };

        let mut sessions = self.sessions.write().await;
        // Opportunistic cleanup keeps the map from growing with abandoned sessions
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(session.token.clone(), session.clone());

        session
    }

    /// Look up a live session; expired sessions are dropped on access
    pub async fn get(&self, token: &str) -> Option<AdminSession> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().await.remove(token);
        None
    }

    /// End a session; returns whether it existed
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Session token carried by a request, bearer header first, then cookie
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        if let Some(token) = bearer {
            return Some(token.to_string());
        }

        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == self.cookie_name && !value.is_empty())
            .map(|(_, value)| value.to_string())
    }

    /// `Set-Cookie` value that hands the session token to a browser
    pub fn session_cookie(&self, session: &AdminSession) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
            self.cookie_name,
            session.token,
            self.ttl.as_secs(),
            if self.cookie_secure { "; Secure" } else { "" }
        )
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn expired_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
            self.cookie_name,
            if self.cookie_secure { "; Secure" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn admin() -> Administrator {
        Administrator {
            id: 7,
            username: "maria".to_string(),
            password_hash: String::new(),
            display_name: "Maria".to_string(),
            email: None,
            created_at: Utc::now(),
        }
    }

    fn store_with_ttl(ttl: Duration) -> SessionStore {
        SessionStore::new(&SessionConfig {
            ttl,
            ..SessionConfig::default()
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store_with_ttl(Duration::from_secs(60));
        let session = store.create(&admin()).await;

        let found = store.get(&session.token).await.unwrap();
        assert_eq!(found.admin_id, 7);
        assert_eq!(found.display_name, "Maria");
        assert!(store.get("not-a-token").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_ends_session() {
        let store = store_with_ttl(Duration::from_secs(60));
        let session = store.create(&admin()).await;

        assert!(store.remove(&session.token).await);
        assert!(!store.remove(&session.token).await);
        assert!(store.get(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let store = store_with_ttl(Duration::ZERO);
        let session = store.create(&admin()).await;

        assert!(store.get(&session.token).await.is_none());
    }

    #[test]
    fn test_token_from_bearer_header() {
        let store = store_with_ttl(Duration::from_secs(60));
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));

        assert_eq!(store.token_from_headers(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_token_from_cookie() {
        let store = store_with_ttl(Duration::from_secs(60));
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sio_session=tok42; lang=pt"),
        );

        assert_eq!(store.token_from_headers(&headers).as_deref(), Some("tok42"));
    }

    #[test]
    fn test_no_token() {
        let store = store_with_ttl(Duration::from_secs(60));
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sio_session="));

        assert!(store.token_from_headers(&headers).is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let store = store_with_ttl(Duration::from_secs(60));
        let session = AdminSession {
            token: "tok".to_string(),
            admin_id: 1,
            username: "admin".to_string(),
            display_name: "Admin".to_string(),
            expires_at: Utc::now(),
        };

        assert_eq!(
            store.session_cookie(&session),
            "sio_session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
        assert!(store.expired_cookie().contains("Max-Age=0"));
    }
}
