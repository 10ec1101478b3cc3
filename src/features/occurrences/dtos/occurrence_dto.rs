use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::occurrences::models::{
    CategoryCount, Occurrence, OccurrenceResponse, OccurrenceStatus,
};
use crate::modules::storage::LocalStorage;
use crate::shared::constants::DISPLAY_TIMESTAMP_FORMAT;

/// `created_at` as shown to people, e.g. `14/03/2025 às 09:15`
pub fn display_timestamp(at: DateTime<Utc>) -> String {
    at.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
}

/// Multipart form for submitting an occurrence (documentation only).
///
/// The Portuguese field names `titulo`, `descricao`, `categoria` and
/// `anexo` are accepted as well.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct SubmitOccurrenceDto {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Optional attachment file
    #[schema(value_type = Option<String>, format = Binary)]
    pub attachment: Option<Vec<u8>>,
}

/// Response DTO for occurrence data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OccurrenceDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: OccurrenceStatus,
    /// URL the attachment is served under
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_at_display: String,
}

impl OccurrenceDto {
    pub fn from_model(occurrence: Occurrence, storage: &LocalStorage) -> Self {
        Self {
            id: occurrence.id,
            title: occurrence.title,
            description: occurrence.description,
            category: occurrence.category,
            status: occurrence.status,
            attachment_url: occurrence.attachment.map(|name| storage.public_url(&name)),
            created_at_display: display_timestamp(occurrence.created_at),
            created_at: occurrence.created_at,
        }
    }
}

/// Response DTO for an administrator's response to an occurrence
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResponseDto {
    pub id: i64,
    pub occurrence_id: i64,
    pub administrator_id: i64,
    /// Display name of the responding administrator
    pub admin_name: String,
    pub message: String,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_at_display: String,
}

impl ResponseDto {
    pub fn from_model(response: OccurrenceResponse, storage: &LocalStorage) -> Self {
        Self {
            id: response.id,
            occurrence_id: response.occurrence_id,
            administrator_id: response.administrator_id,
            admin_name: response.admin_name,
            message: response.message,
            attachment_url: response.attachment.map(|name| storage.public_url(&name)),
            created_at_display: display_timestamp(response.created_at),
            created_at: response.created_at,
        }
    }
}

/// Occurrence together with the responses it received (oldest first)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OccurrenceDetailDto {
    pub occurrence: OccurrenceDto,
    pub responses: Vec<ResponseDto>,
}

/// Id of a newly created record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedIdDto {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCountDto {
    pub category: String,
    pub count: i64,
}

impl From<CategoryCount> for CategoryCountDto {
    fn from(c: CategoryCount) -> Self {
        Self {
            category: c.category,
            count: c.count,
        }
    }
}

/// Public statistics
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OccurrenceStatsDto {
    pub total: i64,
    pub categories: Vec<CategoryCountDto>,
    pub total_categories: usize,
}
