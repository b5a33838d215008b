//! Pricing scheme domain types
//!
//! A scheme selects one of the pricing models and carries the rules object
//! (rates, coverage, tier overrides, percentages) the engine prices against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Pricing model selected by a scheme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Turnkey,
    RateBasedSqft,
    ProductionBased,
    FlatRateUnit,
    HourlyTimeMaterials,
}

impl From<String> for PricingModel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "turnkey" => Self::Turnkey,
            "production_based" => Self::ProductionBased,
            "flat_rate_unit" => Self::FlatRateUnit,
            "hourly_time_materials" => Self::HourlyTimeMaterials,
            _ => Self::RateBasedSqft,
        }
    }
}

impl std::fmt::Display for PricingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Turnkey => write!(f, "turnkey"),
            Self::RateBasedSqft => write!(f, "rate_based_sqft"),
            Self::ProductionBased => write!(f, "production_based"),
            Self::FlatRateUnit => write!(f, "flat_rate_unit"),
            Self::HourlyTimeMaterials => write!(f, "hourly_time_materials"),
        }
    }
}

/// Quality tier a customer can choose (good/better/best)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Good,
    Better,
    Best,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Better => write!(f, "better"),
            Self::Best => write!(f, "best"),
        }
    }
}

/// Sparse per-tier rate overrides. A missing entry falls back to the base
/// rate in [`PricingRules`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TierOverrides {
    #[serde(default)]
    pub labor_rates: HashMap<String, f64>,
    #[serde(default)]
    pub unit_prices: HashMap<String, f64>,
    #[serde(default)]
    pub production_rates: HashMap<String, f64>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub turnkey_rate: Option<f64>,
}

/// Rules object for a pricing scheme.
///
/// Every field has a serde default so a partially configured scheme still
/// deserializes; the engine degrades missing rates to zero contributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRules {
    /// Square feet one gallon covers per coat
    #[serde(default = "default_coverage_rate")]
    pub coverage_rate: f64,

    /// Paint cost per gallon, before markup
    #[serde(default)]
    pub cost_per_gallon: f64,

    /// Coats applied when a surface does not specify its own
    #[serde(default = "default_coats")]
    pub default_coats: u32,

    /// Whether the scheme prices materials at all
    #[serde(default = "default_true")]
    pub include_materials: bool,

    #[serde(default)]
    pub material_markup_percent: f64,

    /// Labor rate per native unit, keyed by surface category
    #[serde(default)]
    pub labor_rates: HashMap<String, f64>,

    /// Flat price per unit, keyed by surface category
    #[serde(default)]
    pub unit_prices: HashMap<String, f64>,

    /// Units produced per crew hour, keyed by surface category
    #[serde(default)]
    pub production_rates: HashMap<String, f64>,

    /// Billable labor rate per hour for time-and-materials schemes
    #[serde(default)]
    pub billable_labor_rate: f64,

    /// Crew headcount; affects schedule duration, never unit cost
    #[serde(default = "default_crew_size")]
    pub crew_size: u32,

    /// Whole-home rate per square foot for turnkey schemes
    #[serde(default)]
    pub turnkey_rate: f64,
    #[serde(default)]
    pub interior_rate: Option<f64>,
    #[serde(default)]
    pub exterior_rate: Option<f64>,

    #[serde(default)]
    pub tiering_enabled: bool,
    #[serde(default)]
    pub tier_overrides: HashMap<Tier, TierOverrides>,

    #[serde(default)]
    pub overhead_percent: f64,
    #[serde(default)]
    pub profit_margin_percent: f64,
    #[serde(default)]
    pub tax_percent: f64,
    #[serde(default)]
    pub deposit_percent: f64,
}

fn default_coverage_rate() -> f64 {
    350.0
}

fn default_coats() -> u32 {
    2
}

fn default_crew_size() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            coverage_rate: default_coverage_rate(),
            cost_per_gallon: 0.0,
            default_coats: default_coats(),
            include_materials: true,
            material_markup_percent: 0.0,
            labor_rates: HashMap::new(),
            unit_prices: HashMap::new(),
            production_rates: HashMap::new(),
            billable_labor_rate: 0.0,
            crew_size: default_crew_size(),
            turnkey_rate: 0.0,
            interior_rate: None,
            exterior_rate: None,
            tiering_enabled: false,
            tier_overrides: HashMap::new(),
            overhead_percent: 0.0,
            profit_margin_percent: 0.0,
            tax_percent: 0.0,
            deposit_percent: 0.0,
        }
    }
}

/// Pricing scheme entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingScheme {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub model: PricingModel,
    pub rules: PricingRules,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a scheme. Rules arrive as loose JSON so missing
/// percentage keys can be filled from company settings before storage.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePricingSchemeRequest {
    pub name: String,
    pub model: PricingModel,
    #[serde(default)]
    pub rules: serde_json::Value,
}

/// Request DTO for updating a scheme
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePricingSchemeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<PricingModel>,
    #[serde(default)]
    pub rules: Option<serde_json::Value>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Response DTO for a scheme
#[derive(Debug, Clone, Serialize)]
pub struct PricingSchemeResponse {
    pub id: Uuid,
    pub name: String,
    pub model: PricingModel,
    pub rules: PricingRules,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PricingScheme> for PricingSchemeResponse {
    fn from(s: PricingScheme) -> Self {
        Self {
            id: s.id,
            name: s.name,
            model: s.model,
            rules: s.rules,
            active: s.active,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
