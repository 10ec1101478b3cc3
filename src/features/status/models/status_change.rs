use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::features::occurrences::models::OccurrenceStatus;

/// Database model for one row of the status audit trail
#[derive(Debug, Clone, FromRow)]
pub struct StatusChange {
    pub id: i64,
    pub occurrence_id: i64,
    pub previous_status: OccurrenceStatus,
    pub new_status: OccurrenceStatus,
    pub administrator_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Audit trail row joined with the acting administrator's display name
#[derive(Debug, Clone, FromRow)]
pub struct StatusChangeEntry {
    #[sqlx(flatten)]
    pub change: StatusChange,
    pub admin_name: String,
}
