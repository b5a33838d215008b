//! Product catalog routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{DataResponse, NoContent};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::products::{
    CreateProductRequest, Product, ProductResponse, UpdateProductRequest,
};
use crate::domain::schemes::Tier;
use crate::error::ApiError;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    company_id: Uuid,
    brand: String,
    name: String,
    sheen: Option<String>,
    tier: String,
    cost_per_gallon: rust_decimal::Decimal,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let tier = match row.tier.as_str() {
            "better" => Tier::Better,
            "best" => Tier::Best,
            _ => Tier::Good,
        };

        // Convert decimal to cents
        let cost_per_gallon_cents = (row.cost_per_gallon * rust_decimal::Decimal::from(100))
            .to_i64()
            .unwrap_or(0);

        Self {
            id: row.id,
            company_id: row.company_id,
            brand: row.brand,
            name: row.name,
            sheen: row.sheen,
            tier,
            cost_per_gallon_cents,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn cents_to_decimal(cents: i64) -> rust_decimal::Decimal {
    rust_decimal::Decimal::from(cents) / rust_decimal::Decimal::from(100)
}

/// POST /products
pub async fn create_product(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        company_id = %auth.company_id,
        brand = %req.brand,
        name = %req.name,
        "Creating product"
    );

    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO products (company_id, brand, name, sheen, tier, cost_per_gallon)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, company_id, brand, name, sheen, tier, cost_per_gallon, active, created_at, updated_at
        "#,
    )
    .bind(auth.company_id)
    .bind(&req.brand)
    .bind(&req.name)
    .bind(&req.sheen)
    .bind(req.tier.to_string())
    .bind(cents_to_decimal(req.cost_per_gallon_cents))
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to create product: {}", e)))?;

    let response: ProductResponse = Product::from(row).into();
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// GET /products
pub async fn list_products(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, company_id, brand, name, sheen, tier, cost_per_gallon, active, created_at, updated_at
        FROM products
        WHERE company_id = $1
        ORDER BY brand ASC, name ASC
        "#,
    )
    .bind(auth.company_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let data: Vec<ProductResponse> = rows
        .into_iter()
        .map(|row| Product::from(row).into())
        .collect();
    Ok(Json(DataResponse::new(data)))
}

/// PUT /products/:product_id
pub async fn update_product(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = sqlx::query_as::<_, ProductRow>(
        "SELECT id, company_id, brand, name, sheen, tier, cost_per_gallon, active, created_at, updated_at FROM products WHERE id = $1 AND company_id = $2",
    )
    .bind(product_id)
    .bind(auth.company_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
    .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let brand = req.brand.unwrap_or(existing.brand);
    let name = req.name.unwrap_or(existing.name);
    let sheen = req.sheen.or(existing.sheen);
    let tier = req
        .tier
        .map(|t| t.to_string())
        .unwrap_or(existing.tier);
    let cost_per_gallon = req
        .cost_per_gallon_cents
        .map(cents_to_decimal)
        .unwrap_or(existing.cost_per_gallon);
    let active = req.active.unwrap_or(existing.active);

    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        UPDATE products
        SET brand = $3, name = $4, sheen = $5, tier = $6, cost_per_gallon = $7, active = $8, updated_at = NOW()
        WHERE id = $1 AND company_id = $2
        RETURNING id, company_id, brand, name, sheen, tier, cost_per_gallon, active, created_at, updated_at
        "#,
    )
    .bind(product_id)
    .bind(auth.company_id)
    .bind(&brand)
    .bind(&name)
    .bind(&sheen)
    .bind(&tier)
    .bind(cost_per_gallon)
    .bind(active)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to update product: {}", e)))?;

    let response: ProductResponse = Product::from(row).into();
    Ok(Json(DataResponse::new(response)))
}

/// DELETE /products/:product_id
pub async fn delete_product(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = sqlx::query("DELETE FROM products WHERE id = $1 AND company_id = $2")
        .bind(product_id)
        .bind(auth.company_id)
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to delete product: {}", e)))?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Product not found"));
    }

    Ok(NoContent)
}
