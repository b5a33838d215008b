//! Material cost calculator
//!
//! Derives paint volume from painted area, coverage rate, and coats, then
//! prices it per gallon with an optional markup. Gallons round up to the
//! nearest half gallon: paint is bought in half-gallon increments at best,
//! so rounding down would under-supply the job.

use rust_decimal::Decimal;

use super::{money, percent};
use crate::domain::schemes::PricingRules;

/// Material cost for one surface. Raw cost and markup stay separate so the
/// proposal can show both.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialCost {
    pub gallons: f64,
    pub raw_cost: Decimal,
    pub markup_amount: Decimal,
}

impl MaterialCost {
    pub fn zero() -> Self {
        Self {
            gallons: 0.0,
            raw_cost: Decimal::ZERO,
            markup_amount: Decimal::ZERO,
        }
    }

    /// Displayed material cost, markup included
    pub fn total(&self) -> Decimal {
        self.raw_cost + self.markup_amount
    }
}

/// Gallons needed to cover `quantity` square feet with `coats` coats,
/// rounded up to the nearest half gallon.
pub fn gallons_required(quantity: f64, coats: u32, coverage_rate: f64) -> f64 {
    if quantity <= 0.0 || coverage_rate <= 0.0 {
        return 0.0;
    }
    let exact = quantity * coats as f64 / coverage_rate;
    (exact * 2.0).ceil() / 2.0
}

/// Price the paint for one surface.
///
/// `manual_gallons` is the user's override; when present the automatic
/// volume derivation is suppressed entirely.
pub fn surface_material(
    quantity: f64,
    coats: u32,
    rules: &PricingRules,
    manual_gallons: Option<f64>,
) -> MaterialCost {
    let gallons = match manual_gallons {
        Some(g) if g.is_finite() && g >= 0.0 => g,
        _ => gallons_required(quantity, coats, rules.coverage_rate),
    };

    let raw_cost = money(gallons) * money(rules.cost_per_gallon);
    let markup_amount = raw_cost * percent(rules.material_markup_percent);

    MaterialCost {
        gallons,
        raw_cost,
        markup_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn gallons_round_up_to_half_gallon() {
        // 352 sqft, 2 coats, 350 sqft/gal: exact need is ~2.011 gallons
        assert_eq!(gallons_required(352.0, 2, 350.0), 2.5);
    }

    #[test]
    fn exact_half_gallons_are_not_inflated() {
        // 175 sqft at 350 sqft/gal and 2 coats is exactly 1.0 gallon
        assert_eq!(gallons_required(175.0, 2, 350.0), 1.0);
        assert_eq!(gallons_required(87.5, 2, 350.0), 0.5);
    }

    #[test]
    fn gallons_never_under_supply() {
        for quantity in [1.0, 53.0, 117.3, 352.0, 999.9, 4821.0] {
            for coats in [1u32, 2, 3] {
                let exact = quantity * coats as f64 / 350.0;
                let rounded = gallons_required(quantity, coats, 350.0);
                assert!(rounded >= exact, "{rounded} under-supplies {exact}");
                // Always a non-negative multiple of 0.5
                assert_eq!((rounded * 2.0).fract(), 0.0);
                assert!(rounded >= 0.0);
            }
        }
    }

    #[test]
    fn zero_coverage_means_zero_gallons() {
        assert_eq!(gallons_required(352.0, 2, 0.0), 0.0);
        assert_eq!(gallons_required(0.0, 2, 350.0), 0.0);
    }

    #[test]
    fn cost_splits_raw_and_markup() {
        let rules = PricingRules {
            coverage_rate: 350.0,
            cost_per_gallon: 40.0,
            material_markup_percent: 25.0,
            ..Default::default()
        };
        let cost = surface_material(352.0, 2, &rules, None);
        assert_eq!(cost.gallons, 2.5);
        assert_eq!(cost.raw_cost, dec("100"));
        assert_eq!(cost.markup_amount, dec("25"));
        assert_eq!(cost.total(), dec("125"));
    }

    #[test]
    fn manual_gallons_suppress_recomputation() {
        let rules = PricingRules {
            coverage_rate: 350.0,
            cost_per_gallon: 40.0,
            ..Default::default()
        };
        let cost = surface_material(352.0, 2, &rules, Some(4.0));
        assert_eq!(cost.gallons, 4.0);
        assert_eq!(cost.raw_cost, dec("160"));
    }

    #[test]
    fn invalid_manual_gallons_fall_back_to_automatic() {
        let rules = PricingRules {
            coverage_rate: 350.0,
            cost_per_gallon: 40.0,
            ..Default::default()
        };
        let cost = surface_material(352.0, 2, &rules, Some(-1.0));
        assert_eq!(cost.gallons, 2.5);
    }
}
