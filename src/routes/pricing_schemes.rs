//! Pricing scheme routes
//!
//! Scheme CRUD plus calculation previews against a stored scheme. Schemes
//! are cached by id; every write invalidates the cache.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{DataResponse, NoContent};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::quotes::CalculateAreasRequest;
use crate::domain::schemes::{
    CreatePricingSchemeRequest, PricingRules, PricingScheme, PricingSchemeResponse,
    UpdatePricingSchemeRequest,
};
use crate::domain::settings::DefaultPercentages;
use crate::error::ApiError;
use crate::pricing::{self, QuoteInput};
use crate::services::cache::keys;

/// Database row for pricing scheme
#[derive(Debug, sqlx::FromRow)]
struct SchemeRow {
    id: Uuid,
    company_id: Uuid,
    name: String,
    model: String,
    rules: serde_json::Value,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SchemeRow> for PricingScheme {
    fn from(row: SchemeRow) -> Self {
        // A malformed rules blob degrades to defaults rather than breaking
        // every quote that references the scheme
        let rules: PricingRules = serde_json::from_value(row.rules).unwrap_or_default();
        Self {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            model: row.model.into(),
            rules,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Load a company's scheme, trying the cache first.
pub async fn load_scheme(
    state: &AppState,
    company_id: Uuid,
    scheme_id: Uuid,
) -> Result<PricingScheme, ApiError> {
    if let Some(scheme) = state.cache.get::<PricingScheme>(&keys::scheme(scheme_id)).await {
        if scheme.company_id == company_id {
            return Ok(scheme);
        }
        return Err(ApiError::not_found("Pricing scheme not found"));
    }

    let row = sqlx::query_as::<_, SchemeRow>(
        "SELECT id, company_id, name, model, rules, active, created_at, updated_at FROM pricing_schemes WHERE id = $1 AND company_id = $2",
    )
    .bind(scheme_id)
    .bind(company_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
    .ok_or_else(|| ApiError::not_found("Pricing scheme not found"))?;

    let scheme: PricingScheme = row.into();
    let _ = state.cache.set(&keys::scheme(scheme_id), &scheme).await;
    Ok(scheme)
}

async fn invalidate_scheme(state: &AppState, scheme_id: Uuid) {
    if let Err(e) = state.cache.delete(&keys::scheme(scheme_id)).await {
        tracing::warn!(scheme_id = %scheme_id, error = %e, "Failed to invalidate scheme cache");
    }
}

/// Fill percentage keys the contractor left out from company settings.
async fn rules_with_defaults(
    state: &AppState,
    company_id: Uuid,
    rules: serde_json::Value,
) -> Result<serde_json::Value, ApiError> {
    let defaults: DefaultPercentages = sqlx::query_scalar::<_, serde_json::Value>(
        "SELECT defaults FROM company_settings WHERE company_id = $1",
    )
    .bind(company_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
    .and_then(|v| serde_json::from_value(v).ok())
    .unwrap_or_default();

    let mut obj = match rules {
        serde_json::Value::Null => serde_json::Map::new(),
        serde_json::Value::Object(obj) => obj,
        _ => return Err(ApiError::bad_request("Scheme rules must be an object")),
    };

    let fills = [
        ("overhead_percent", defaults.overhead_percent),
        ("profit_margin_percent", defaults.profit_margin_percent),
        ("tax_percent", defaults.tax_percent),
        ("deposit_percent", defaults.deposit_percent),
    ];
    for (key, value) in fills {
        if !obj.contains_key(key) {
            obj.insert(key.to_string(), serde_json::json!(value));
        }
    }
    let rules = serde_json::Value::Object(obj);

    // Reject rules that would not deserialize at calculation time
    serde_json::from_value::<PricingRules>(rules.clone())
        .map_err(|e| ApiError::bad_request(format!("Invalid scheme rules: {}", e)))?;

    Ok(rules)
}

/// POST /pricing-schemes
pub async fn create_scheme(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePricingSchemeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        company_id = %auth.company_id,
        name = %req.name,
        model = %req.model,
        "Creating pricing scheme"
    );

    let rules = rules_with_defaults(&state, auth.company_id, req.rules).await?;

    let row = sqlx::query_as::<_, SchemeRow>(
        r#"
        INSERT INTO pricing_schemes (company_id, name, model, rules)
        VALUES ($1, $2, $3, $4)
        RETURNING id, company_id, name, model, rules, active, created_at, updated_at
        "#,
    )
    .bind(auth.company_id)
    .bind(&req.name)
    .bind(req.model.to_string())
    .bind(&rules)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to create scheme: {}", e)))?;

    let response: PricingSchemeResponse = PricingScheme::from(row).into();
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// GET /pricing-schemes
pub async fn list_schemes(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = sqlx::query_as::<_, SchemeRow>(
        "SELECT id, company_id, name, model, rules, active, created_at, updated_at FROM pricing_schemes WHERE company_id = $1 ORDER BY name ASC",
    )
    .bind(auth.company_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let data: Vec<PricingSchemeResponse> = rows
        .into_iter()
        .map(|row| PricingScheme::from(row).into())
        .collect();
    Ok(Json(DataResponse::new(data)))
}

/// GET /pricing-schemes/:scheme_id
pub async fn get_scheme(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(scheme_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scheme = load_scheme(&state, auth.company_id, scheme_id).await?;
    let response: PricingSchemeResponse = scheme.into();
    Ok(Json(DataResponse::new(response)))
}

/// PUT /pricing-schemes/:scheme_id
pub async fn update_scheme(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(scheme_id): Path<Uuid>,
    Json(req): Json<UpdatePricingSchemeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = sqlx::query_as::<_, SchemeRow>(
        "SELECT id, company_id, name, model, rules, active, created_at, updated_at FROM pricing_schemes WHERE id = $1 AND company_id = $2",
    )
    .bind(scheme_id)
    .bind(auth.company_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
    .ok_or_else(|| ApiError::not_found("Pricing scheme not found"))?;

    let name = req.name.unwrap_or(existing.name);
    let model = req
        .model
        .map(|m| m.to_string())
        .unwrap_or(existing.model);
    let active = req.active.unwrap_or(existing.active);
    let rules = match req.rules {
        Some(rules) => rules_with_defaults(&state, auth.company_id, rules).await?,
        None => existing.rules,
    };

    let row = sqlx::query_as::<_, SchemeRow>(
        r#"
        UPDATE pricing_schemes
        SET name = $3, model = $4, rules = $5, active = $6, updated_at = NOW()
        WHERE id = $1 AND company_id = $2
        RETURNING id, company_id, name, model, rules, active, created_at, updated_at
        "#,
    )
    .bind(scheme_id)
    .bind(auth.company_id)
    .bind(&name)
    .bind(&model)
    .bind(&rules)
    .bind(active)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to update scheme: {}", e)))?;

    invalidate_scheme(&state, scheme_id).await;

    let response: PricingSchemeResponse = PricingScheme::from(row).into();
    Ok(Json(DataResponse::new(response)))
}

/// DELETE /pricing-schemes/:scheme_id
pub async fn delete_scheme(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(scheme_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = sqlx::query("DELETE FROM pricing_schemes WHERE id = $1 AND company_id = $2")
        .bind(scheme_id)
        .bind(auth.company_id)
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to delete scheme: {}", e)))?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Pricing scheme not found"));
    }

    invalidate_scheme(&state, scheme_id).await;
    Ok(NoContent)
}

/// POST /pricing-schemes/:scheme_id/calculate
///
/// Price a payload of areas against a stored scheme without persisting.
pub async fn calculate_with_scheme(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(scheme_id): Path<Uuid>,
    Json(req): Json<CalculateAreasRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let scheme = load_scheme(&state, auth.company_id, scheme_id).await?;

    let input = QuoteInput {
        areas: &req.areas,
        job_type: req.job_type,
        home_square_footage: req.home_square_footage,
        tier: req.tier,
    };
    let totals = pricing::calculate_quote(&input, scheme.model, &scheme.rules)?;

    tracing::info!(
        company_id = %auth.company_id,
        scheme_id = %scheme_id,
        total_cents = totals.total_cents,
        "Calculated scheme preview"
    );

    Ok(Json(DataResponse::new(totals)))
}
