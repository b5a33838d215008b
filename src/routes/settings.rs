//! Company settings routes
//!
//! The admin screen's default percentages. Reads fall back to defaults when
//! the company has never saved settings.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::settings::{
    CompanySettings, CompanySettingsResponse, DefaultPercentages, UpdateCompanySettingsRequest,
};
use crate::error::ApiError;

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    company_id: Uuid,
    defaults: serde_json::Value,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for CompanySettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            company_id: row.company_id,
            defaults: serde_json::from_value(row.defaults).unwrap_or_default(),
            updated_at: row.updated_at,
        }
    }
}

/// GET /settings/company
pub async fn get_company_settings(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let row = sqlx::query_as::<_, SettingsRow>(
        "SELECT company_id, defaults, updated_at FROM company_settings WHERE company_id = $1",
    )
    .bind(auth.company_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let settings = match row {
        Some(row) => row.into(),
        None => CompanySettings {
            company_id: auth.company_id,
            defaults: DefaultPercentages::default(),
            updated_at: Utc::now(),
        },
    };

    let response: CompanySettingsResponse = settings.into();
    Ok(Json(DataResponse::new(response)))
}

/// PUT /settings/company
pub async fn update_company_settings(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateCompanySettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let defaults = serde_json::to_value(&req.defaults)
        .map_err(|e| ApiError::internal(format!("Failed to encode settings: {}", e)))?;

    let row = sqlx::query_as::<_, SettingsRow>(
        r#"
        INSERT INTO company_settings (company_id, defaults)
        VALUES ($1, $2)
        ON CONFLICT (company_id) DO UPDATE SET defaults = $2, updated_at = NOW()
        RETURNING company_id, defaults, updated_at
        "#,
    )
    .bind(auth.company_id)
    .bind(&defaults)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to update settings: {}", e)))?;

    tracing::info!(company_id = %auth.company_id, "Company settings updated");

    let response: CompanySettingsResponse = CompanySettings::from(row).into();
    Ok(Json(DataResponse::new(response)))
}
