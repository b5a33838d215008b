//! Notification routes
//!
//! The company feed written by the quote event listener.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::pagination::PaginationParams;
use crate::api::pagination::Paginated;
use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::notifications::NotificationResponse;
use crate::error::ApiError;

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    #[sqlx(rename = "type")]
    notification_type: String,
    title: String,
    message: Option<String>,
    data: serde_json::Value,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for NotificationResponse {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            notification_type: row.notification_type,
            title: row.title,
            message: row.message,
            data: row.data,
            read_at: row.read_at,
            created_at: row.created_at,
        }
    }
}

/// GET /notifications
pub async fn list_notifications(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let offset = pagination.offset() as i64;
    let limit = pagination.limit() as i64;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE company_id = $1")
        .bind(auth.company_id)
        .fetch_one(&state.db)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let rows = sqlx::query_as::<_, NotificationRow>(
        r#"
        SELECT id, type, title, message, data, read_at, created_at
        FROM notifications
        WHERE company_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(auth.company_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let data: Vec<NotificationResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(Paginated::new(data, &pagination, total as u64)))
}

/// POST /notifications/:notification_id/read
pub async fn mark_notification_read(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = sqlx::query(
        "UPDATE notifications SET read_at = COALESCE(read_at, NOW()) WHERE id = $1 AND company_id = $2",
    )
    .bind(notification_id)
    .bind(auth.company_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to mark notification read: {}", e)))?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Notification not found"));
    }

    Ok(Json(DataResponse::new(serde_json::json!({ "read": true }))))
}
