//! Tier selector
//!
//! Resolves effective rates for a (category, tier) pair. Overrides are
//! sparse: a missing override falls back to the base rate, and disabled
//! tiering always uses base rates. The same layering applies to labor
//! rates, unit prices, production rates, hourly rates, and turnkey rates.

use crate::domain::quotes::JobType;
use crate::domain::schemes::{PricingRules, Tier, TierOverrides};

fn overrides(rules: &PricingRules, tier: Option<Tier>) -> Option<&TierOverrides> {
    if !rules.tiering_enabled {
        return None;
    }
    tier.and_then(|t| rules.tier_overrides.get(&t))
}

/// Effective per-unit labor rate for a category, or `None` when the scheme
/// has no rate configured at any layer.
pub fn labor_rate(rules: &PricingRules, tier: Option<Tier>, category: &str) -> Option<f64> {
    overrides(rules, tier)
        .and_then(|o| o.labor_rates.get(category).copied())
        .or_else(|| rules.labor_rates.get(category).copied())
}

/// Effective flat price per unit for a category
pub fn unit_price(rules: &PricingRules, tier: Option<Tier>, category: &str) -> Option<f64> {
    overrides(rules, tier)
        .and_then(|o| o.unit_prices.get(category).copied())
        .or_else(|| rules.unit_prices.get(category).copied())
}

/// Effective production rate (units per crew hour) for a category
pub fn production_rate(rules: &PricingRules, tier: Option<Tier>, category: &str) -> Option<f64> {
    overrides(rules, tier)
        .and_then(|o| o.production_rates.get(category).copied())
        .or_else(|| rules.production_rates.get(category).copied())
}

/// Effective billable hourly rate
pub fn hourly_rate(rules: &PricingRules, tier: Option<Tier>) -> f64 {
    overrides(rules, tier)
        .and_then(|o| o.hourly_rate)
        .unwrap_or(rules.billable_labor_rate)
}

/// Effective whole-home rate per square foot. The tier override wins, then
/// the job-type specialization, then the base turnkey rate.
pub fn turnkey_rate(rules: &PricingRules, tier: Option<Tier>, job_type: JobType) -> f64 {
    if let Some(rate) = overrides(rules, tier).and_then(|o| o.turnkey_rate) {
        return rate;
    }
    match job_type {
        JobType::Interior => rules.interior_rate,
        JobType::Exterior => rules.exterior_rate,
    }
    .unwrap_or(rules.turnkey_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn rules_with_override() -> PricingRules {
        let mut rules = PricingRules {
            tiering_enabled: true,
            ..Default::default()
        };
        rules.labor_rates.insert("Walls".to_string(), 1.50);
        rules.labor_rates.insert("Trim".to_string(), 2.25);

        let mut best = TierOverrides::default();
        best.labor_rates.insert("Walls".to_string(), 2.10);
        best.hourly_rate = Some(95.0);
        best.turnkey_rate = Some(4.50);
        rules.tier_overrides = HashMap::from([(Tier::Best, best)]);
        rules
    }

    #[test]
    fn override_replaces_base_rate() {
        let rules = rules_with_override();
        assert_eq!(labor_rate(&rules, Some(Tier::Best), "Walls"), Some(2.10));
    }

    #[test]
    fn missing_override_falls_back_to_base() {
        let rules = rules_with_override();
        // "Trim" has no Best override; every tier must see the base rate
        for tier in [None, Some(Tier::Good), Some(Tier::Better), Some(Tier::Best)] {
            assert_eq!(labor_rate(&rules, tier, "Trim"), Some(2.25));
        }
    }

    #[test]
    fn disabled_tiering_ignores_overrides() {
        let mut rules = rules_with_override();
        rules.tiering_enabled = false;
        assert_eq!(labor_rate(&rules, Some(Tier::Best), "Walls"), Some(1.50));
        assert_eq!(hourly_rate(&rules, Some(Tier::Best)), 0.0);
    }

    #[test]
    fn unknown_category_has_no_rate() {
        let rules = rules_with_override();
        assert_eq!(labor_rate(&rules, Some(Tier::Good), "Cabinets"), None);
    }

    #[test]
    fn turnkey_layering_order() {
        let mut rules = rules_with_override();
        rules.turnkey_rate = 3.00;
        rules.exterior_rate = Some(3.75);

        // Tier override wins
        assert_eq!(turnkey_rate(&rules, Some(Tier::Best), JobType::Exterior), 4.50);
        // Then the job-type specialization
        assert_eq!(turnkey_rate(&rules, Some(Tier::Good), JobType::Exterior), 3.75);
        // Then the base rate
        assert_eq!(turnkey_rate(&rules, None, JobType::Interior), 3.00);
    }
}
