//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use sevahub_core::error::AppError;
use sevahub_entity::receipt::NotificationFilter;
use sevahub_service::notification::{CreateNotification, UpdateNotification};

use crate::dto::request::{
    CreateNotificationRequest, NotificationFilterParams, UpdateNotificationRequest,
};
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let notification = state
        .notification_service
        .create(
            CreateNotification {
                title: req.title,
                body: req.body,
                category: req.category,
                link: req.link,
                metadata: req.metadata,
                recipient_id: req.recipient_id,
                created_by: Some(auth.user_id),
            },
            &req.recipient_ids,
        )
        .await?;

    Ok(Json(
        serde_json::json!({ "success": true, "data": notification }),
    ))
}

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<NotificationFilterParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sort_field = pagination.sort_field()?;

    let result = state
        .notification_service
        .list(
            auth.user_id,
            pagination.page_request(),
            sort_field,
            pagination.sort_direction(),
            NotificationFilter {
                search: filters.search,
                category: filters.category,
                is_read: filters.is_read,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.unread_count(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notification = state.notification_service.get(id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": notification }),
    ))
}

/// PUT /api/notifications/{id}
pub async fn update_notification(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNotificationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notification = state
        .notification_service
        .update(
            id,
            UpdateNotification {
                title: req.title,
                body: req.body,
                category: req.category,
                link: req.link,
                metadata: req.metadata,
            },
        )
        .await?;

    Ok(Json(
        serde_json::json!({ "success": true, "data": notification }),
    ))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let receipt = state
        .notification_service
        .mark_read(id, auth.user_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": receipt })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = state
        .notification_service
        .mark_all_read(auth.user_id)
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "marked": count } }),
    ))
}

/// PUT /api/notifications/{id}/archive
pub async fn archive_notification(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notification = state.notification_service.archive(id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": notification }),
    ))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.notification_service.remove(id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Notification deleted" } }),
    ))
}
