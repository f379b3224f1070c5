//! Notification store repository.

use sqlx::PgPool;
use uuid::Uuid;

use sevahub_core::error::{AppError, ErrorKind};
use sevahub_core::result::AppResult;
use sevahub_entity::notification::Notification;

/// Repository for the recipient-independent notification store.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new notification.
    pub async fn create(
        &self,
        title: &str,
        body: &str,
        category: &str,
        link: Option<&str>,
        metadata: Option<&serde_json::Value>,
        created_by: Option<Uuid>,
    ) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, title, body, category, link, metadata, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(body)
        .bind(category)
        .bind(link)
        .bind(metadata)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    /// Fetch a notification by id.
    pub async fn find_by_id(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(notification_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load notification", e)
            })
    }

    /// Apply an explicit edit to a notification's content fields.
    ///
    /// Fields passed as `None` are left untouched.
    pub async fn update(
        &self,
        notification_id: Uuid,
        title: Option<&str>,
        body: Option<&str>,
        category: Option<&str>,
        link: Option<&str>,
        metadata: Option<&serde_json::Value>,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET \
                title = COALESCE($2, title), \
                body = COALESCE($3, body), \
                category = COALESCE($4, category), \
                link = COALESCE($5, link), \
                metadata = COALESCE($6, metadata) \
             WHERE id = $1 RETURNING *",
        )
        .bind(notification_id)
        .bind(title)
        .bind(body)
        .bind(category)
        .bind(link)
        .bind(metadata)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update notification", e))
    }

    /// Soft-delete a notification. Ledger rows are kept.
    pub async fn archive(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET archived = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to archive notification", e)
        })
    }

    /// Hard-delete a notification; ledger rows cascade. Returns the number
    /// of notifications removed (0 or 1).
    pub async fn delete(&self, notification_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;
        Ok(result.rows_affected())
    }
}
