use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Occurrence status.
///
/// Stored and serialized with the labels the service has always used
/// ("Pendente", "Em Andamento", "Resolvido"); parsing also accepts the
/// English variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
pub enum OccurrenceStatus {
    #[sqlx(rename = "Pendente")]
    #[serde(rename = "Pendente")]
    Pending,
    #[sqlx(rename = "Em Andamento")]
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[sqlx(rename = "Resolvido")]
    #[serde(rename = "Resolvido")]
    Resolved,
}

impl OccurrenceStatus {
    pub const ALL: [OccurrenceStatus; 3] = [
        OccurrenceStatus::Pending,
        OccurrenceStatus::InProgress,
        OccurrenceStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OccurrenceStatus::Pending => "Pendente",
            OccurrenceStatus::InProgress => "Em Andamento",
            OccurrenceStatus::Resolved => "Resolvido",
        }
    }
}

impl std::fmt::Display for OccurrenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OccurrenceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "pendente" | "pending" => Ok(OccurrenceStatus::Pending),
            "emandamento" | "inprogress" => Ok(OccurrenceStatus::InProgress),
            "resolvido" | "resolved" => Ok(OccurrenceStatus::Resolved),
            _ => Err(AppError::Validation(format!(
                "Invalid status '{}'. Allowed values: {}",
                s.trim(),
                OccurrenceStatus::ALL
                    .iter()
                    .map(OccurrenceStatus::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// Database model for occurrence
#[derive(Debug, Clone, FromRow)]
pub struct Occurrence {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Stored attachment filename (not a URL)
    pub attachment: Option<String>,
    pub status: OccurrenceStatus,
    pub created_at: DateTime<Utc>,
}

/// Occurrence joined with the number of responses it received
#[derive(Debug, Clone, FromRow)]
pub struct OccurrenceWithResponseCount {
    #[sqlx(flatten)]
    pub occurrence: Occurrence,
    pub response_count: i64,
}

/// Validated data for creating a new occurrence
#[derive(Debug, Clone)]
pub struct CreateOccurrence {
    pub title: String,
    pub description: String,
    pub category: String,
    pub attachment: Option<String>,
}

/// Per-category occurrence count
#[derive(Debug, Clone, FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}
