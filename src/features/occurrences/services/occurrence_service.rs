use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::occurrences::dtos::{
    CategoryCountDto, OccurrenceDetailDto, OccurrenceDto, OccurrenceStatsDto, ResponseDto,
};
use crate::features::occurrences::models::{
    CategoryCount, CreateOccurrence, Occurrence, OccurrenceResponse, OccurrenceStatus,
};
use crate::modules::storage::{AttachmentKind, LocalStorage};
use crate::shared::multipart::UploadedFile;
use crate::shared::validation::required_text;

/// Order in which responses to an occurrence are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOrder {
    OldestFirst,
    NewestFirst,
}

/// Service for public occurrence submission and queries
pub struct OccurrenceService {
    pool: SqlitePool,
    storage: Arc<LocalStorage>,
}

impl OccurrenceService {
    pub fn new(pool: SqlitePool, storage: Arc<LocalStorage>) -> Self {
        Self { pool, storage }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Register a new occurrence. It always starts out Pending.
    pub async fn submit(
        &self,
        title: Option<String>,
        description: Option<String>,
        category: Option<String>,
        attachment: Option<UploadedFile>,
    ) -> Result<i64> {
        let title = required_text(title, "title");
        let description = required_text(description, "description");
        let category = required_text(category, "category");

        let (title, description, category) = match (title, description, category) {
            (Ok(t), Ok(d), Ok(c)) => (t, d, c),
            (t, d, c) => {
                let missing: Vec<&str> = [
                    ("title", t.is_err()),
                    ("description", d.is_err()),
                    ("category", c.is_err()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                return Err(AppError::Validation(format!(
                    "Required fields missing: {}",
                    missing.join(", ")
                )));
            }
        };

        let stored_attachment = match attachment {
            Some(file) => {
                tracing::debug!(
                    "Storing occurrence attachment {} ({}, {} bytes)",
                    file.filename,
                    file.content_type,
                    file.data.len()
                );
                Some(
                    self.storage
                        .save(AttachmentKind::Occurrence, &file.filename, &file.data)
                        .await?,
                )
            }
            None => None,
        };

        let data = CreateOccurrence {
            title,
            description,
            category,
            attachment: stored_attachment,
        };

        match self.insert(&data).await {
            Ok(id) => {
                tracing::info!(
                    "Occurrence {} registered in category '{}'",
                    id,
                    data.category
                );
                Ok(id)
            }
            Err(e) => {
                if let Some(name) = &data.attachment {
                    if let Err(cleanup) = self.storage.delete(name).await {
                        tracing::warn!("Failed to remove orphaned attachment {}: {}", name, cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    /// All occurrences, newest first
    pub async fn list_all(&self) -> Result<Vec<OccurrenceDto>> {
        let occurrences = sqlx::query_as::<_, Occurrence>(
            r#"
            SELECT id, title, description, category, attachment, status, created_at
            FROM occurrences
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list occurrences: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(occurrences
            .into_iter()
            .map(|o| OccurrenceDto::from_model(o, &self.storage))
            .collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Occurrence> {
        sqlx::query_as::<_, Occurrence>(
            r#"
            SELECT id, title, description, category, attachment, status, created_at
            FROM occurrences
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch occurrence: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Occurrence {} not found", id)))
    }

    /// Responses to an occurrence with their authors' display names
    pub async fn list_responses(
        &self,
        occurrence_id: i64,
        order: ResponseOrder,
    ) -> Result<Vec<ResponseDto>> {
        let query = match order {
            ResponseOrder::OldestFirst => RESPONSES_OLDEST_FIRST,
            ResponseOrder::NewestFirst => RESPONSES_NEWEST_FIRST,
        };

        let responses = sqlx::query_as::<_, OccurrenceResponse>(query)
            .bind(occurrence_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list responses: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(responses
            .into_iter()
            .map(|r| ResponseDto::from_model(r, &self.storage))
            .collect())
    }

    /// Occurrence with its responses, oldest response first
    pub async fn get_detail(&self, id: i64) -> Result<OccurrenceDetailDto> {
        let occurrence = self.get_by_id(id).await?;
        let responses = self.list_responses(id, ResponseOrder::OldestFirst).await?;

        Ok(OccurrenceDetailDto {
            occurrence: OccurrenceDto::from_model(occurrence, &self.storage),
            responses,
        })
    }

    /// Total count and per-category breakdown
    pub async fn stats(&self) -> Result<OccurrenceStatsDto> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM occurrences")
            .fetch_one(&self.pool)
            .await?;

        let categories = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT category, COUNT(*) AS count
            FROM occurrences
            GROUP BY category
            ORDER BY count DESC, category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count occurrences per category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(OccurrenceStatsDto {
            total,
            total_categories: categories.len(),
            categories: categories.into_iter().map(CategoryCountDto::from).collect(),
        })
    }

    async fn insert(&self, data: &CreateOccurrence) -> Result<i64> {
        sqlx::query_scalar(
            r#"
            INSERT INTO occurrences (title, description, category, attachment, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.category)
        .bind(&data.attachment)
        .bind(OccurrenceStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert occurrence: {:?}", e);
            AppError::Database(e)
        })
    }
}

const RESPONSES_OLDEST_FIRST: &str = r#"
    SELECT r.id, r.occurrence_id, r.administrator_id, a.display_name AS admin_name,
           r.message, r.attachment, r.created_at
    FROM responses r
    JOIN administrators a ON a.id = r.administrator_id
    WHERE r.occurrence_id = ?
    ORDER BY r.id ASC
"#;

const RESPONSES_NEWEST_FIRST: &str = r#"
    SELECT r.id, r.occurrence_id, r.administrator_id, a.display_name AS admin_name,
           r.message, r.attachment, r.created_at
    FROM responses r
    JOIN administrators a ON a.id = r.administrator_id
    WHERE r.occurrence_id = ?
    ORDER BY r.id DESC
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{insert_admin, insert_response, test_pool, test_storage};
    use fake::faker::lorem::en::{Sentence, Word};
    use fake::Fake;

    async fn service() -> (OccurrenceService, tempfile::TempDir) {
        let pool = test_pool().await;
        let (storage, dir) = test_storage();
        (OccurrenceService::new(pool, Arc::new(storage)), dir)
    }

    fn text(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[tokio::test]
    async fn test_submit_starts_pending() {
        let (service, _dir) = service().await;

        let id = service
            .submit(
                text("Broken light"),
                text("Light pole down"),
                text("Infrastructure"),
                None,
            )
            .await
            .unwrap();

        let occurrence = service.get_by_id(id).await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(occurrence.status, OccurrenceStatus::Pending);
        assert_eq!(occurrence.title, "Broken light");
        assert!(occurrence.attachment.is_none());
    }

    #[tokio::test]
    async fn test_submit_trims_fields() {
        let (service, _dir) = service().await;

        let id = service
            .submit(text("  Buraco  "), text("\tNa rua\n"), text(" Vias "), None)
            .await
            .unwrap();

        let occurrence = service.get_by_id(id).await.unwrap();
        assert_eq!(occurrence.title, "Buraco");
        assert_eq!(occurrence.description, "Na rua");
        assert_eq!(occurrence.category, "Vias");
    }

    #[tokio::test]
    async fn test_submit_requires_every_field() {
        let (service, _dir) = service().await;

        let cases = [
            (None, text("d"), text("c")),
            (text("t"), text("   "), text("c")),
            (text("t"), text("d"), text("")),
        ];

        for (title, description, category) in cases {
            let result = service.submit(title, description, category, None).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }

        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_stores_attachment() {
        let (service, dir) = service().await;

        let id = service
            .submit(
                text("Poste"),
                text("Caído"),
                text("Iluminação"),
                Some(UploadedFile {
                    filename: "../foto do poste.jpg".to_string(),
                    content_type: "image/jpeg".to_string(),
                    data: b"jpeg".to_vec(),
                }),
            )
            .await
            .unwrap();

        let occurrence = service.get_by_id(id).await.unwrap();
        let stored = occurrence.attachment.unwrap();
        assert!(stored.ends_with("_foto_do_poste.jpg"));
        assert_eq!(std::fs::read(dir.path().join(&stored)).unwrap(), b"jpeg");

        let listed = service.list_all().await.unwrap();
        assert_eq!(
            listed[0].attachment_url.as_deref(),
            Some(format!("/uploads/{}", stored).as_str())
        );
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let (service, _dir) = service().await;
        for title in ["first", "second", "third"] {
            service
                .submit(text(title), Some(Sentence(3..6).fake()), Some(Word().fake()), None)
                .await
                .unwrap();
        }

        let titles: Vec<String> = service
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.title)
            .collect();

        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_get_detail_unknown_id() {
        let (service, _dir) = service().await;
        assert!(matches!(
            service.get_detail(42).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_detail_lists_responses_oldest_first() {
        let (service, _dir) = service().await;
        let admin_id = insert_admin(&service.pool, "joao", "João Silva").await;
        let id = service
            .submit(text("Lixo"), text("Acumulado"), text("Limpeza"), None)
            .await
            .unwrap();
        insert_response(&service.pool, id, admin_id, "Primeira").await;
        insert_response(&service.pool, id, admin_id, "Segunda").await;

        let detail = service.get_detail(id).await.unwrap();
        let messages: Vec<&str> = detail.responses.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["Primeira", "Segunda"]);
        assert_eq!(detail.responses[0].admin_name, "João Silva");

        let newest = service
            .list_responses(id, ResponseOrder::NewestFirst)
            .await
            .unwrap();
        assert_eq!(newest[0].message, "Segunda");
    }

    #[tokio::test]
    async fn test_stats_counts_categories() {
        let (service, _dir) = service().await;
        for category in ["Vias", "Iluminação", "Vias"] {
            service
                .submit(text("t"), text("d"), text(category), None)
                .await
                .unwrap();
        }

        let stats = service.stats().await.unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.total_categories, 2);
        assert_eq!(stats.categories[0].category, "Vias");
        assert_eq!(stats.categories[0].count, 2);
        assert_eq!(stats.categories[1].count, 1);
    }
}
