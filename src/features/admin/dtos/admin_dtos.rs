use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::occurrences::dtos::{display_timestamp, OccurrenceDto, ResponseDto};
use crate::features::occurrences::models::OccurrenceStatus;
use crate::features::status::models::{StatusChange, StatusChangeEntry};

// =============================================================================
// STATISTICS
// =============================================================================

/// Occurrence counts by status, plus how many received a response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminStatsDto {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    /// Distinct occurrences with at least one response
    pub responded: i64,
}

// =============================================================================
// OCCURRENCES
// =============================================================================

/// Occurrence row in the admin list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminOccurrenceDto {
    #[serde(flatten)]
    pub occurrence: OccurrenceDto,
    pub response_count: i64,
}

/// Full admin view of an occurrence
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminOccurrenceDetailDto {
    pub occurrence: OccurrenceDto,
    /// Newest first
    pub responses: Vec<ResponseDto>,
    /// Newest first
    pub history: Vec<StatusChangeDto>,
}

// =============================================================================
// STATUS
// =============================================================================

/// One entry of an occurrence's status history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusChangeDto {
    pub id: i64,
    pub previous_status: OccurrenceStatus,
    pub new_status: OccurrenceStatus,
    pub administrator_id: i64,
    pub admin_name: String,
    pub created_at: DateTime<Utc>,
    pub created_at_display: String,
}

impl From<StatusChangeEntry> for StatusChangeDto {
    fn from(entry: StatusChangeEntry) -> Self {
        Self {
            id: entry.change.id,
            previous_status: entry.change.previous_status,
            new_status: entry.change.new_status,
            administrator_id: entry.change.administrator_id,
            admin_name: entry.admin_name,
            created_at_display: display_timestamp(entry.change.created_at),
            created_at: entry.change.created_at,
        }
    }
}

/// Request DTO for changing an occurrence's status
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    /// "Pendente", "Em Andamento" or "Resolvido" (English names also accepted)
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "Resolvido")]
    pub status: String,
}

/// Result of a status change
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusChangeResultDto {
    pub occurrence_id: i64,
    pub previous_status: OccurrenceStatus,
    pub new_status: OccurrenceStatus,
}

impl From<StatusChange> for StatusChangeResultDto {
    fn from(change: StatusChange) -> Self {
        Self {
            occurrence_id: change.occurrence_id,
            previous_status: change.previous_status,
            new_status: change.new_status,
        }
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Multipart form for responding to an occurrence (documentation only)
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct RespondDto {
    pub ocorrencia_id: i64,
    pub mensagem: String,
    /// Optional attachment file
    #[schema(value_type = Option<String>, format = Binary)]
    pub anexo: Option<Vec<u8>>,
}
