//! Company settings domain types
//!
//! Default percentages applied to new pricing schemes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default percentages for new pricing schemes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultPercentages {
    #[serde(default)]
    pub overhead_percent: f64,
    #[serde(default)]
    pub profit_margin_percent: f64,
    #[serde(default)]
    pub tax_percent: f64,
    #[serde(default = "default_deposit_percent")]
    pub deposit_percent: f64,
}

fn default_deposit_percent() -> f64 {
    30.0
}

impl Default for DefaultPercentages {
    fn default() -> Self {
        Self {
            overhead_percent: 0.0,
            profit_margin_percent: 0.0,
            tax_percent: 0.0,
            deposit_percent: default_deposit_percent(),
        }
    }
}

/// Company settings entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySettings {
    pub company_id: Uuid,
    pub defaults: DefaultPercentages,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for updating company settings
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompanySettingsRequest {
    pub defaults: DefaultPercentages,
}

/// Response DTO for company settings
#[derive(Debug, Clone, Serialize)]
pub struct CompanySettingsResponse {
    pub company_id: Uuid,
    pub defaults: DefaultPercentages,
    pub updated_at: DateTime<Utc>,
}

impl From<CompanySettings> for CompanySettingsResponse {
    fn from(s: CompanySettings) -> Self {
        Self {
            company_id: s.company_id,
            defaults: s.defaults,
            updated_at: s.updated_at,
        }
    }
}
