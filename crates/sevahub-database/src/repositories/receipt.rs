//! Recipient ledger repository.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use sevahub_core::error::{AppError, ErrorKind};
use sevahub_core::result::AppResult;
use sevahub_core::types::pagination::{PageRequest, PageResponse};
use sevahub_core::types::sorting::SortDirection;
use sevahub_entity::receipt::{
    NotificationFilter, NotificationReceipt, NotificationSortField, UserNotification,
};

/// Repository for per-(notification, user) ledger entries.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: PgPool,
}

impl ReceiptRepository {
    /// Create a new receipt repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create one unread ledger entry per recipient.
    ///
    /// Targeting a (notification, user) pair that is already ledgered is a
    /// no-op. Returns the number of newly created entries.
    pub async fn create_for_users(
        &self,
        notification_id: Uuid,
        user_ids: &[Uuid],
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "INSERT INTO notification_receipts (notification_id, user_id) \
             SELECT $1, recipient FROM UNNEST($2::uuid[]) AS recipient \
             ON CONFLICT (notification_id, user_id) DO NOTHING",
        )
        .bind(notification_id)
        .bind(user_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create receipts", e))?;
        Ok(result.rows_affected())
    }

    /// Fetch the ledger entry for a (notification, user) pair.
    pub async fn find_one(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<NotificationReceipt>> {
        sqlx::query_as::<_, NotificationReceipt>(
            "SELECT * FROM notification_receipts WHERE notification_id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load receipt", e))
    }

    /// List a user's notifications joined with their ledger state.
    ///
    /// Only rows with a ledger entry for `user_id` are visible; archived
    /// notifications and archived ledger rows are excluded.
    pub async fn find_page_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
        sort_field: NotificationSortField,
        sort_direction: SortDirection,
        filter: &NotificationFilter,
    ) -> AppResult<PageResponse<UserNotification>> {
        let mut count_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM notifications n \
             JOIN notification_receipts r ON r.notification_id = n.id",
        );
        push_filters(&mut count_query, user_id, filter);

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
            })?;

        let mut page_query = QueryBuilder::<Postgres>::new(
            "SELECT n.id, n.title, n.body, n.category, n.link, n.metadata, n.created_at, \
                    r.is_read, r.read_at \
             FROM notifications n \
             JOIN notification_receipts r ON r.notification_id = n.id",
        );
        push_filters(&mut page_query, user_id, filter);
        page_query.push(format!(
            " ORDER BY {} {}",
            sort_field.as_column(),
            sort_direction.as_sql()
        ));
        page_query.push(" LIMIT ");
        page_query.push_bind(page.limit() as i64);
        page_query.push(" OFFSET ");
        page_query.push_bind(page.offset() as i64);

        let rows = page_query
            .build_query_as::<UserNotification>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
            })?;

        Ok(PageResponse::new(
            rows,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Transition a ledger entry to read, setting `read_at` once.
    ///
    /// Returns `None` when no unread entry matched — either the pair does not
    /// exist or it is already read; callers disambiguate via [`Self::find_one`].
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<NotificationReceipt>> {
        sqlx::query_as::<_, NotificationReceipt>(
            "UPDATE notification_receipts SET is_read = TRUE, read_at = NOW() \
             WHERE notification_id = $1 AND user_id = $2 AND is_read = FALSE \
             RETURNING *",
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    /// Mark every unread, non-archived entry for a user as read.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notification_receipts SET is_read = TRUE, read_at = NOW() \
             WHERE user_id = $1 AND is_read = FALSE AND archived = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    /// Count unread, non-archived entries for a user.
    ///
    /// Served by the (user_id, is_read, archived) index; cheap enough to run
    /// on every connect and on every read-state mutation.
    pub async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notification_receipts \
             WHERE user_id = $1 AND is_read = FALSE AND archived = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }
}

/// Append the WHERE clause shared by the count and page queries.
fn push_filters(query: &mut QueryBuilder<'_, Postgres>, user_id: Uuid, filter: &NotificationFilter) {
    query.push(" WHERE r.user_id = ");
    query.push_bind(user_id);
    query.push(" AND n.archived = FALSE AND r.archived = FALSE");

    if let Some(category) = &filter.category {
        query.push(" AND n.category = ");
        query.push_bind(category.clone());
    }
    if let Some(is_read) = filter.is_read {
        query.push(" AND r.is_read = ");
        query.push_bind(is_read);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query.push(" AND (n.title ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR n.body ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
}
