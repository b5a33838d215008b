//! Labor cost calculator
//!
//! Prices a resolved quantity under the scheme's pricing model. A missing
//! rate degrades to a zero contribution with a warning rather than failing
//! the whole calculation; an incomplete rate table must not make the quote
//! builder unusable.

use rust_decimal::Decimal;

use super::{money, tiers};
use crate::domain::quotes::{JobType, MeasurementUnit};
use crate::domain::schemes::{PricingModel, PricingRules, Tier};

/// Labor cost for one surface
#[derive(Debug, Clone, PartialEq)]
pub struct LaborCost {
    pub cost: Decimal,
    /// Billable hours, populated only for time-and-materials schemes
    pub estimated_hours: Option<f64>,
}

impl LaborCost {
    fn flat(cost: Decimal) -> Self {
        Self {
            cost,
            estimated_hours: None,
        }
    }

    fn zero() -> Self {
        Self::flat(Decimal::ZERO)
    }
}

/// Price one surface's labor under the scheme's model.
///
/// Turnkey schemes price the whole home at the aggregator; per-surface labor
/// is zero there.
pub fn surface_labor(
    model: PricingModel,
    rules: &PricingRules,
    tier: Option<Tier>,
    category: &str,
    unit: MeasurementUnit,
    quantity: f64,
) -> LaborCost {
    match model {
        PricingModel::RateBasedSqft | PricingModel::ProductionBased => {
            match tiers::labor_rate(rules, tier, category) {
                Some(rate) => LaborCost::flat(money(quantity) * money(rate)),
                None => {
                    tracing::warn!(category, model = %model, "No labor rate configured, surface priced at zero");
                    LaborCost::zero()
                }
            }
        }
        PricingModel::FlatRateUnit => match tiers::unit_price(rules, tier, category) {
            Some(price) => LaborCost::flat(money(quantity) * money(price)),
            None => {
                tracing::warn!(category, model = %model, "No unit price configured, surface priced at zero");
                LaborCost::zero()
            }
        },
        PricingModel::HourlyTimeMaterials => {
            let hours = estimated_hours(rules, tier, category, unit, quantity);
            let rate = tiers::hourly_rate(rules, tier);
            LaborCost {
                cost: money(hours) * money(rate),
                estimated_hours: Some(hours),
            }
        }
        PricingModel::Turnkey => LaborCost::zero(),
    }
}

/// Whole-home labor for turnkey schemes
pub fn turnkey_labor(
    rules: &PricingRules,
    tier: Option<Tier>,
    job_type: JobType,
    home_square_footage: f64,
) -> Decimal {
    let rate = tiers::turnkey_rate(rules, tier, job_type);
    money(home_square_footage) * money(rate)
}

/// Billable hours for a surface. Surfaces measured directly in hours skip
/// the production-rate conversion.
fn estimated_hours(
    rules: &PricingRules,
    tier: Option<Tier>,
    category: &str,
    unit: MeasurementUnit,
    quantity: f64,
) -> f64 {
    if unit == MeasurementUnit::Hour {
        return quantity;
    }
    let rate = tiers::production_rate(rules, tier, category)
        .unwrap_or_else(|| default_production_rate(category));
    if rate > 0.0 {
        quantity / rate
    } else {
        0.0
    }
}

/// Fallback production rates (units per crew hour) when the scheme does not
/// configure one for the category.
pub fn default_production_rate(category: &str) -> f64 {
    let c = category.to_ascii_lowercase();
    if c.contains("ceiling") {
        100.0
    } else if c.contains("wall") {
        150.0
    } else if c.contains("trim") || c.contains("base") || c.contains("molding") {
        60.0
    } else if c.contains("door") {
        1.5
    } else if c.contains("cabinet") {
        2.0
    } else if c.contains("window") || c.contains("shutter") {
        2.0
    } else {
        100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rate_rules() -> PricingRules {
        let mut rules = PricingRules::default();
        rules.labor_rates.insert("Exterior Walls".to_string(), 1.75);
        rules.unit_prices.insert("Doors".to_string(), 125.0);
        rules.production_rates.insert("Walls".to_string(), 160.0);
        rules.billable_labor_rate = 85.0;
        rules.crew_size = 3;
        rules
    }

    #[test]
    fn rate_based_is_quantity_times_rate() {
        let labor = surface_labor(
            PricingModel::RateBasedSqft,
            &rate_rules(),
            None,
            "Exterior Walls",
            MeasurementUnit::Sqft,
            400.0,
        );
        assert_eq!(labor.cost, dec("700"));
        assert_eq!(labor.estimated_hours, None);
    }

    #[test]
    fn missing_rate_prices_at_zero() {
        let labor = surface_labor(
            PricingModel::RateBasedSqft,
            &rate_rules(),
            None,
            "Stucco",
            MeasurementUnit::Sqft,
            400.0,
        );
        assert_eq!(labor.cost, Decimal::ZERO);
    }

    #[test]
    fn flat_rate_is_count_times_unit_price() {
        let labor = surface_labor(
            PricingModel::FlatRateUnit,
            &rate_rules(),
            None,
            "Doors",
            MeasurementUnit::Unit,
            4.0,
        );
        assert_eq!(labor.cost, dec("500"));
    }

    #[test]
    fn hourly_uses_production_rate_and_billable_rate() {
        let labor = surface_labor(
            PricingModel::HourlyTimeMaterials,
            &rate_rules(),
            None,
            "Walls",
            MeasurementUnit::Sqft,
            800.0,
        );
        // 800 sqft at 160 sqft/hour is 5 hours at $85
        assert_eq!(labor.estimated_hours, Some(5.0));
        assert_eq!(labor.cost, dec("425"));
    }

    #[test]
    fn crew_size_never_multiplies_cost() {
        // crew_size is 3 in the fixture; cost must match the single-crew figure
        let labor = surface_labor(
            PricingModel::HourlyTimeMaterials,
            &rate_rules(),
            None,
            "Walls",
            MeasurementUnit::Sqft,
            800.0,
        );
        assert_eq!(labor.cost, dec("425"));
    }

    #[test]
    fn hourly_falls_back_to_default_production_rate() {
        let labor = surface_labor(
            PricingModel::HourlyTimeMaterials,
            &rate_rules(),
            None,
            "Ceilings",
            MeasurementUnit::Sqft,
            200.0,
        );
        // No configured rate; ceilings default to 100 units/hour
        assert_eq!(labor.estimated_hours, Some(2.0));
        assert_eq!(labor.cost, dec("170"));
    }

    #[test]
    fn hour_unit_surfaces_bill_directly() {
        let labor = surface_labor(
            PricingModel::HourlyTimeMaterials,
            &rate_rules(),
            None,
            "Drywall Repair",
            MeasurementUnit::Hour,
            3.5,
        );
        assert_eq!(labor.estimated_hours, Some(3.5));
        assert_eq!(labor.cost, dec("297.5"));
    }

    #[test]
    fn turnkey_prices_whole_home() {
        let mut rules = rate_rules();
        rules.turnkey_rate = 3.25;
        assert_eq!(
            turnkey_labor(&rules, None, JobType::Interior, 2000.0),
            dec("6500")
        );
    }

    #[test]
    fn per_surface_labor_is_zero_under_turnkey() {
        let labor = surface_labor(
            PricingModel::Turnkey,
            &rate_rules(),
            None,
            "Exterior Walls",
            MeasurementUnit::Sqft,
            400.0,
        );
        assert_eq!(labor.cost, Decimal::ZERO);
    }
}
