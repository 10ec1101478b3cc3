use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for an administrator response, joined with the
/// author's display name
#[derive(Debug, Clone, FromRow)]
pub struct OccurrenceResponse {
    pub id: i64,
    pub occurrence_id: i64,
    pub administrator_id: i64,
    pub admin_name: String,
    pub message: String,
    /// Stored attachment filename (not a URL)
    pub attachment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for appending a response to an occurrence
#[derive(Debug, Clone)]
pub struct CreateOccurrenceResponse {
    pub occurrence_id: i64,
    pub administrator_id: i64,
    pub message: String,
    pub attachment: Option<String>,
}
