//! Product catalog domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schemes::Tier;

/// Catalog product (a paint line at a quality tier)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub brand: String,
    pub name: String,
    pub sheen: Option<String>,
    pub tier: Tier,
    /// Cost per gallon in cents
    pub cost_per_gallon_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a product
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub sheen: Option<String>,
    pub tier: Tier,
    pub cost_per_gallon_cents: i64,
}

/// Request DTO for updating a product
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sheen: Option<String>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub cost_per_gallon_cents: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Response DTO for a product
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub brand: String,
    pub name: String,
    pub sheen: Option<String>,
    pub tier: Tier,
    pub cost_per_gallon_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            brand: p.brand,
            name: p.name,
            sheen: p.sheen,
            tier: p.tier,
            cost_per_gallon_cents: p.cost_per_gallon_cents,
            active: p.active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
