//! Quote domain types
//!
//! The quote aggregate: areas, surface line items, measurements, product
//! selections, lifecycle status, and the computed totals breakdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schemes::Tier;

/// Quote lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Viewed,
    Accepted,
    Scheduled,
    Declined,
    Archived,
}

impl Default for QuoteStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl From<String> for QuoteStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "sent" => Self::Sent,
            "viewed" => Self::Viewed,
            "accepted" => Self::Accepted,
            "scheduled" => Self::Scheduled,
            "declined" => Self::Declined,
            "archived" => Self::Archived,
            _ => Self::Draft,
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Sent => write!(f, "sent"),
            Self::Viewed => write!(f, "viewed"),
            Self::Accepted => write!(f, "accepted"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::Declined => write!(f, "declined"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// Interior or exterior job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    Interior,
    Exterior,
}

impl From<String> for JobType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "exterior" => Self::Exterior,
            _ => Self::Interior,
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interior => write!(f, "interior"),
            Self::Exterior => write!(f, "exterior"),
        }
    }
}

/// Native unit a surface is measured in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementUnit {
    Sqft,
    LinearFoot,
    Unit,
    Hour,
}

impl std::fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqft => write!(f, "sqft"),
            Self::LinearFoot => write!(f, "linear_foot"),
            Self::Unit => write!(f, "unit"),
            Self::Hour => write!(f, "hour"),
        }
    }
}

/// How structured measurements combine into a quantity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalcMode {
    Perimeter,
    Area,
    Linear,
    Unit,
}

/// User-entered measurements for a surface.
///
/// Exactly one representation is active: either a direct quantity in the
/// surface's native unit, or structured measurements combined according to
/// the surface's calculation mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dimensions {
    Direct {
        area: f64,
    },
    Measured {
        #[serde(default)]
        length: Option<f64>,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
        #[serde(default)]
        linear_feet: Option<f64>,
        #[serde(default)]
        count: Option<f64>,
    },
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::Measured {
            length: None,
            width: None,
            height: None,
            linear_feet: None,
            count: None,
        }
    }
}

/// One paintable surface within an area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceLineItem {
    pub category: String,
    pub unit: MeasurementUnit,
    pub mode: CalcMode,
    #[serde(default = "default_selected")]
    pub selected: bool,
    /// Coats for this surface; falls back to the scheme default when absent
    #[serde(default)]
    pub coats: Option<u32>,
    #[serde(default)]
    pub dimensions: Dimensions,
    /// User-entered gallons, honored when `manual_gallons` is set
    #[serde(default)]
    pub gallons: Option<f64>,
    #[serde(default)]
    pub manual_gallons: bool,
}

fn default_selected() -> bool {
    true
}

/// A named physical region of the job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub surfaces: Vec<SurfaceLineItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Chosen product for a surface at a given tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSelection {
    pub category: String,
    pub tier: Tier,
    pub product_id: Uuid,
    pub price_cents: i64,
}

/// Computed cost breakdown for a single surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceTotals {
    pub category: String,
    pub unit: MeasurementUnit,
    pub quantity: f64,
    pub coats: u32,
    pub gallons: f64,
    pub labor_cents: i64,
    pub material_cents: i64,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
}

/// Computed cost breakdown for one area
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaTotals {
    pub name: String,
    pub labor_cents: i64,
    pub material_cents: i64,
    pub gallons: f64,
    pub surfaces: Vec<SurfaceTotals>,
}

/// Full quote cost breakdown.
///
/// Money is integer cents; the engine rounds once, at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteTotals {
    pub labor_total_cents: i64,
    /// Raw material cost before markup
    pub material_cost_cents: i64,
    pub material_markup_percent: f64,
    pub material_markup_cents: i64,
    pub material_total_cents: i64,
    pub overhead_percent: f64,
    pub overhead_cents: i64,
    pub subtotal_before_profit_cents: i64,
    pub profit_margin_percent: f64,
    pub profit_cents: i64,
    pub subtotal_cents: i64,
    pub tax_percent: f64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub deposit_percent: f64,
    pub deposit_cents: i64,
    pub balance_cents: i64,
    pub total_gallons: f64,
    /// Billable hours for time-and-materials schemes
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Wall-clock schedule estimate: billable hours spread across the crew
    #[serde(default)]
    pub estimated_duration_hours: Option<f64>,
    pub areas: Vec<AreaTotals>,
}

/// Quote entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub company_id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub job_address: Option<String>,
    pub job_type: JobType,
    pub status: QuoteStatus,
    pub scheme_id: Option<Uuid>,
    pub tier: Option<Tier>,
    pub home_square_footage: Option<f64>,
    pub areas: Vec<Area>,
    pub product_selections: Vec<ProductSelection>,
    pub totals: Option<QuoteTotals>,
    pub notes: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a quote
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuoteRequest {
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub job_address: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub scheme_id: Option<Uuid>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub home_square_footage: Option<f64>,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub product_selections: Vec<ProductSelection>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request DTO for updating a quote
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuoteRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub job_address: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub scheme_id: Option<Uuid>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub home_square_footage: Option<f64>,
    #[serde(default)]
    pub areas: Option<Vec<Area>>,
    #[serde(default)]
    pub product_selections: Option<Vec<ProductSelection>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Ad hoc calculation request: a scheme reference plus the form state
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateQuoteRequest {
    pub scheme_id: Uuid,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub home_square_footage: Option<f64>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

/// Calculation request against a scheme already named in the path
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateAreasRequest {
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub home_square_footage: Option<f64>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

/// Response DTO for a quote
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub job_address: Option<String>,
    pub job_type: JobType,
    pub status: QuoteStatus,
    pub scheme_id: Option<Uuid>,
    pub tier: Option<Tier>,
    pub home_square_footage: Option<f64>,
    pub areas: Vec<Area>,
    pub product_selections: Vec<ProductSelection>,
    pub totals: Option<QuoteTotals>,
    pub notes: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            id: q.id,
            customer_name: q.customer_name,
            customer_email: q.customer_email,
            customer_phone: q.customer_phone,
            job_address: q.job_address,
            job_type: q.job_type,
            status: q.status,
            scheme_id: q.scheme_id,
            tier: q.tier,
            home_square_footage: q.home_square_footage,
            areas: q.areas,
            product_selections: q.product_selections,
            totals: q.totals,
            notes: q.notes,
            sent_at: q.sent_at,
            viewed_at: q.viewed_at,
            decided_at: q.decided_at,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// Quote summary for list views
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub id: Uuid,
    pub customer_name: String,
    pub job_type: JobType,
    pub status: QuoteStatus,
    pub total_cents: Option<i64>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
