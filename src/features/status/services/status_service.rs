use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::core::error::{AppError, Result};
use crate::features::occurrences::models::OccurrenceStatus;
use crate::features::status::models::{StatusChange, StatusChangeEntry};

/// Service for occurrence status transitions and their audit trail
pub struct StatusService {
    pool: SqlitePool,
}

impl StatusService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Move an occurrence to `new_status` on behalf of an administrator.
    ///
    /// The status read, the status write and the history insert share one
    /// transaction. The write only applies if the status is still the one
    /// that was read, so a concurrent change surfaces as a conflict instead
    /// of a history row with a stale `previous_status`.
    ///
    /// The transaction takes the write lock up front (`BEGIN IMMEDIATE`), so
    /// concurrent administrators queue on the busy timeout instead of failing
    /// to upgrade a read lock.
    ///
    /// Any legal status may follow any other, including the same one.
    pub async fn change_status(
        &self,
        occurrence_id: i64,
        new_status: OccurrenceStatus,
        administrator_id: i64,
    ) -> Result<StatusChange> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let previous_status = sqlx::query_scalar::<_, OccurrenceStatus>(
            "SELECT status FROM occurrences WHERE id = ?",
        )
        .bind(occurrence_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read occurrence status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Occurrence {} not found", occurrence_id)))?;

        let updated = sqlx::query("UPDATE occurrences SET status = ? WHERE id = ? AND status = ?")
            .bind(new_status)
            .bind(occurrence_id)
            .bind(previous_status)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update occurrence status: {:?}", e);
                AppError::Database(e)
            })?
            .rows_affected();

        if updated == 0 {
            tracing::warn!(
                "Status of occurrence {} changed concurrently, rejecting update to {}",
                occurrence_id,
                new_status
            );
            return Err(AppError::Conflict(format!(
                "Occurrence {} was modified concurrently, please retry",
                occurrence_id
            )));
        }

        let change = Self::record_change(
            &mut *tx,
            occurrence_id,
            previous_status,
            new_status,
            administrator_id,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Occurrence {} status changed: {} -> {} (admin {})",
            occurrence_id,
            previous_status,
            new_status,
            administrator_id
        );

        Ok(change)
    }

    /// Advance a Pending occurrence to InProgress because an administrator
    /// responded to it. Runs on the caller's connection so it joins the
    /// caller's transaction.
    ///
    /// Returns the history row when the transition happened, `None` when the
    /// occurrence was no longer Pending.
    pub async fn advance_on_response(
        conn: &mut SqliteConnection,
        occurrence_id: i64,
        administrator_id: i64,
    ) -> Result<Option<StatusChange>> {
        let updated = sqlx::query("UPDATE occurrences SET status = ? WHERE id = ? AND status = ?")
            .bind(OccurrenceStatus::InProgress)
            .bind(occurrence_id)
            .bind(OccurrenceStatus::Pending)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to advance occurrence status: {:?}", e);
                AppError::Database(e)
            })?
            .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        let change = Self::record_change(
            conn,
            occurrence_id,
            OccurrenceStatus::Pending,
            OccurrenceStatus::InProgress,
            administrator_id,
        )
        .await?;

        tracing::info!(
            "Occurrence {} moved to {} after first response (admin {})",
            occurrence_id,
            OccurrenceStatus::InProgress,
            administrator_id
        );

        Ok(Some(change))
    }

    /// Status history for an occurrence, newest first
    pub async fn list_history(&self, occurrence_id: i64) -> Result<Vec<StatusChangeEntry>> {
        sqlx::query_as::<_, StatusChangeEntry>(
            r#"
            SELECT
                h.id, h.occurrence_id, h.previous_status, h.new_status,
                h.administrator_id, h.created_at,
                a.display_name AS admin_name
            FROM status_history h
            JOIN administrators a ON a.id = h.administrator_id
            WHERE h.occurrence_id = ?
            ORDER BY h.id DESC
            "#,
        )
        .bind(occurrence_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list status history: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn record_change(
        conn: &mut SqliteConnection,
        occurrence_id: i64,
        previous_status: OccurrenceStatus,
        new_status: OccurrenceStatus,
        administrator_id: i64,
    ) -> Result<StatusChange> {
        sqlx::query_as::<_, StatusChange>(
            r#"
            INSERT INTO status_history
                (occurrence_id, previous_status, new_status, administrator_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, occurrence_id, previous_status, new_status, administrator_id, created_at
            "#,
        )
        .bind(occurrence_id)
        .bind(previous_status)
        .bind(new_status)
        .bind(administrator_id)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record status change: {:?}", e);
            AppError::Database(e)
        })
    }
}
