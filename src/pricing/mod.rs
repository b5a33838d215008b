//! Quote pricing engine
//!
//! The single source of truth for pricing math. Every route that prices
//! anything calls into this module; no handler reimplements a formula.
//!
//! The engine is pure and synchronous: measurements resolve to quantities,
//! quantities price into labor and material costs under the scheme's pricing
//! model and tier, and the aggregator folds everything into the quote
//! breakdown in a fixed order. Money is `Decimal` throughout and rounds to
//! cents exactly once, at the output boundary.

pub mod aggregate;
pub mod labor;
pub mod materials;
pub mod measurement;
pub mod tiers;

pub use aggregate::{calculate_quote, QuoteInput};

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Calculation failure. Validation issues are user-correctable input states,
/// not fatal errors; the caller reports them and the user fixes the form.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("quote input failed validation")]
    Validation(Vec<ValidationIssue>),
}

/// One validation problem, naming the offending input
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

/// Convert a measurement or rate into exact decimal money math.
/// Non-finite inputs collapse to zero, matching the resolver's policy.
pub(crate) fn money(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or_default()
}

/// Percentage as a decimal multiplier (e.g. 15 -> 0.15)
pub(crate) fn percent(p: f64) -> Decimal {
    money(p) / Decimal::from(100)
}

/// Round to cents (half away from zero) and return integer cents.
/// This is the only place money precision is dropped.
pub(crate) fn to_cents(v: Decimal) -> i64 {
    (v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero) * Decimal::from(100))
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_collapses_non_finite_to_zero() {
        assert_eq!(money(f64::NAN), Decimal::ZERO);
        assert_eq!(money(f64::INFINITY), Decimal::ZERO);
        assert_eq!(money(12.5), "12.5".parse().unwrap());
    }

    #[test]
    fn to_cents_rounds_half_away_from_zero() {
        assert_eq!(to_cents("10.005".parse().unwrap()), 1001);
        assert_eq!(to_cents("10.004".parse().unwrap()), 1000);
        assert_eq!(to_cents("614.79".parse().unwrap()), 61479);
    }

    #[test]
    fn percent_is_a_multiplier() {
        assert_eq!(percent(15.0), "0.15".parse().unwrap());
        assert_eq!(percent(0.0), Decimal::ZERO);
    }
}
