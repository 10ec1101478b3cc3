use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::*;
use crate::features::auth::AdminSession;
use crate::features::occurrences::dtos::OccurrenceDto;
use crate::features::occurrences::models::{
    CreateOccurrenceResponse, OccurrenceStatus, OccurrenceWithResponseCount,
};
use crate::features::occurrences::services::ResponseOrder;
use crate::features::occurrences::OccurrenceService;
use crate::features::status::StatusService;
use crate::modules::storage::AttachmentKind;
use crate::shared::multipart::UploadedFile;
use crate::shared::validation::required_text;

/// Service for staff-only occurrence management.
///
/// Every operation takes the caller's [`AdminSession`]; mutations are
/// attributed to `session.admin_id`.
pub struct AdminService {
    pool: SqlitePool,
    occurrences: Arc<OccurrenceService>,
    status: Arc<StatusService>,
}

impl AdminService {
    pub fn new(
        pool: SqlitePool,
        occurrences: Arc<OccurrenceService>,
        status: Arc<StatusService>,
    ) -> Self {
        Self {
            pool,
            occurrences,
            status,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub async fn stats(&self, _session: &AdminSession) -> Result<AdminStatsDto> {
        let (total, pending, in_progress, resolved) = sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0)
            FROM occurrences
            "#,
        )
        .bind(OccurrenceStatus::Pending)
        .bind(OccurrenceStatus::InProgress)
        .bind(OccurrenceStatus::Resolved)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count occurrences by status: {:?}", e);
            AppError::Database(e)
        })?;

        let responded: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT occurrence_id) FROM responses")
                .fetch_one(&self.pool)
                .await?;

        Ok(AdminStatsDto {
            total,
            pending,
            in_progress,
            resolved,
            responded,
        })
    }

    /// All occurrences newest first, each with its response count
    pub async fn list_all(&self, _session: &AdminSession) -> Result<Vec<AdminOccurrenceDto>> {
        let rows = sqlx::query_as::<_, OccurrenceWithResponseCount>(
            r#"
            SELECT
                o.id, o.title, o.description, o.category, o.attachment, o.status, o.created_at,
                (SELECT COUNT(*) FROM responses r WHERE r.occurrence_id = o.id) AS response_count
            FROM occurrences o
            ORDER BY o.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list occurrences for admin: {:?}", e);
            AppError::Database(e)
        })?;

        let storage = self.occurrences.storage();
        Ok(rows
            .into_iter()
            .map(|row| AdminOccurrenceDto {
                occurrence: OccurrenceDto::from_model(row.occurrence, storage),
                response_count: row.response_count,
            })
            .collect())
    }

    /// Occurrence with responses and status history, both newest first
    pub async fn get_detail(
        &self,
        _session: &AdminSession,
        id: i64,
    ) -> Result<AdminOccurrenceDetailDto> {
        let occurrence = self.occurrences.get_by_id(id).await?;
        let responses = self
            .occurrences
            .list_responses(id, ResponseOrder::NewestFirst)
            .await?;
        let history = self.status.list_history(id).await?;

        Ok(AdminOccurrenceDetailDto {
            occurrence: OccurrenceDto::from_model(occurrence, self.occurrences.storage()),
            responses,
            history: history.into_iter().map(StatusChangeDto::from).collect(),
        })
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Post a response to an occurrence.
    ///
    /// The attachment is stored first; the response insert and the
    /// Pending -> InProgress advance then commit together in a write
    /// transaction. Returns the new response id.
    pub async fn respond(
        &self,
        session: &AdminSession,
        occurrence_id: Option<String>,
        message: Option<String>,
        attachment: Option<UploadedFile>,
    ) -> Result<i64> {
        let occurrence_id = required_text(occurrence_id, "ocorrencia_id")?
            .parse::<i64>()
            .map_err(|_| AppError::Validation("ocorrencia_id must be an integer".to_string()))?;
        let message = required_text(message, "mensagem")?;

        // Occurrences are never deleted; check once, outside the write transaction
        self.occurrences.get_by_id(occurrence_id).await?;

        let storage = self.occurrences.storage();
        let stored_attachment = match attachment {
            Some(file) => {
                tracing::debug!(
                    "Storing response attachment {} ({}, {} bytes)",
                    file.filename,
                    file.content_type,
                    file.data.len()
                );
                Some(
                    storage
                        .save(AttachmentKind::Response, &file.filename, &file.data)
                        .await?,
                )
            }
            None => None,
        };

        let data = CreateOccurrenceResponse {
            occurrence_id,
            administrator_id: session.admin_id,
            message,
            attachment: stored_attachment,
        };

        let result = async {
            let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

            let response_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO responses (occurrence_id, administrator_id, message, attachment, created_at)
                VALUES (?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(data.occurrence_id)
            .bind(data.administrator_id)
            .bind(&data.message)
            .bind(&data.attachment)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert response: {:?}", e);
                AppError::Database(e)
            })?;

            StatusService::advance_on_response(&mut *tx, data.occurrence_id, data.administrator_id)
                .await?;

            tx.commit().await?;
            Ok::<_, AppError>(response_id)
        }
        .await;

        match result {
            Ok(response_id) => {
                tracing::info!(
                    "Response {} posted to occurrence {} by admin {}",
                    response_id,
                    occurrence_id,
                    session.admin_id
                );
                Ok(response_id)
            }
            Err(e) => {
                if let Some(name) = &data.attachment {
                    if let Err(cleanup) = storage.delete(name).await {
                        tracing::warn!("Failed to remove orphaned attachment {}: {}", name, cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    /// Set an occurrence's status from its raw label
    pub async fn set_status(
        &self,
        session: &AdminSession,
        occurrence_id: i64,
        raw_status: &str,
    ) -> Result<StatusChangeResultDto> {
        let new_status: OccurrenceStatus = raw_status.parse()?;

        let change = self
            .status
            .change_status(occurrence_id, new_status, session.admin_id)
            .await?;

        Ok(StatusChangeResultDto::from(change))
    }
}
