//! Lead routes
//!
//! Public capture from the contractor's website form, plus authenticated
//! pipeline management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::pagination::PaginationParams;
use crate::api::pagination::Paginated;
use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::leads::{CreateLeadRequest, Lead, LeadResponse, UpdateLeadStatusRequest};
use crate::error::ApiError;
use crate::services::notifications;

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: Uuid,
    company_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    job_type: String,
    message: Option<String>,
    source: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            job_type: row.job_type.into(),
            message: row.message,
            source: row.source,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct LeadQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<String>,
}

/// POST /leads
///
/// Public lead capture. The website form posts here with the company id
/// baked into the embed.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Lead name is required"));
    }

    let row = sqlx::query_as::<_, LeadRow>(
        r#"
        INSERT INTO leads (company_id, name, email, phone, address, job_type, message, source)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, company_id, name, email, phone, address, job_type, message, source, status, created_at, updated_at
        "#,
    )
    .bind(req.company_id)
    .bind(req.name.trim())
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.address)
    .bind(req.job_type.to_string())
    .bind(&req.message)
    .bind(&req.source)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to create lead: {}", e)))?;

    tracing::info!(
        company_id = %row.company_id,
        lead_id = %row.id,
        source = ?row.source,
        "Lead captured"
    );

    if let Err(e) =
        notifications::notify_lead_received(&state.db, row.company_id, row.id, &row.name).await
    {
        tracing::warn!(lead_id = %row.id, error = %e, "Failed to write lead notification");
    }

    let response: LeadResponse = Lead::from(row).into();
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// GET /leads
pub async fn list_leads(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let offset = query.pagination.offset() as i64;
    let limit = query.pagination.limit() as i64;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM leads
        WHERE company_id = $1
        AND ($2::text IS NULL OR status = $2)
        "#,
    )
    .bind(auth.company_id)
    .bind(&query.status)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let rows = sqlx::query_as::<_, LeadRow>(
        r#"
        SELECT id, company_id, name, email, phone, address, job_type, message, source, status, created_at, updated_at
        FROM leads
        WHERE company_id = $1
        AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(auth.company_id)
    .bind(&query.status)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let data: Vec<LeadResponse> = rows
        .into_iter()
        .map(|row| Lead::from(row).into())
        .collect();
    Ok(Json(Paginated::new(data, &query.pagination, total as u64)))
}

/// PUT /leads/:lead_id/status
pub async fn update_lead_status(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(lead_id): Path<Uuid>,
    Json(req): Json<UpdateLeadStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let row = sqlx::query_as::<_, LeadRow>(
        r#"
        UPDATE leads
        SET status = $3, updated_at = NOW()
        WHERE id = $1 AND company_id = $2
        RETURNING id, company_id, name, email, phone, address, job_type, message, source, status, created_at, updated_at
        "#,
    )
    .bind(lead_id)
    .bind(auth.company_id)
    .bind(req.status.to_string())
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to update lead: {}", e)))?
    .ok_or_else(|| ApiError::not_found("Lead not found"))?;

    tracing::info!(
        company_id = %auth.company_id,
        lead_id = %lead_id,
        status = %req.status,
        "Lead status updated"
    );

    let response: LeadResponse = Lead::from(row).into();
    Ok(Json(DataResponse::new(response)))
}
