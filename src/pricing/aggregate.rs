//! Quote aggregator
//!
//! Folds per-surface labor and material costs into the full quote breakdown.
//! The aggregation order is fixed: labor + material, then overhead, then
//! profit, then tax, then the deposit split. Reordering changes percentage
//! semantics, so each step builds on the previous subtotal. Intermediate
//! values stay at full decimal precision; rounding happens once, when the
//! breakdown is converted to cents.

use rust_decimal::Decimal;

use super::{labor, materials, measurement, percent, to_cents, PricingError, ValidationIssue};
use crate::domain::quotes::{Area, AreaTotals, JobType, MeasurementUnit, QuoteTotals, SurfaceTotals};
use crate::domain::schemes::{PricingModel, PricingRules, Tier};

/// Everything the engine needs from the quote form state
#[derive(Debug, Clone)]
pub struct QuoteInput<'a> {
    pub areas: &'a [Area],
    pub job_type: JobType,
    pub home_square_footage: Option<f64>,
    pub tier: Option<Tier>,
}

/// Compute the full cost breakdown for a quote.
///
/// Fails only on invalid input (an area with nothing priceable, or a turnkey
/// quote without home square footage); missing rates degrade to zero inside
/// the labor calculator.
pub fn calculate_quote(
    input: &QuoteInput,
    model: PricingModel,
    rules: &PricingRules,
) -> Result<QuoteTotals, PricingError> {
    validate(input, model)?;

    let mut labor_total = Decimal::ZERO;
    let mut material_raw = Decimal::ZERO;
    let mut material_markup = Decimal::ZERO;
    let mut total_gallons = 0.0_f64;
    let mut total_hours = 0.0_f64;
    let mut areas_out = Vec::with_capacity(input.areas.len());

    if model == PricingModel::Turnkey {
        // Whole-home pricing bypasses per-surface computation entirely
        labor_total = labor::turnkey_labor(
            rules,
            input.tier,
            input.job_type,
            input.home_square_footage.unwrap_or(0.0),
        );
    } else {
        for area in input.areas {
            let mut area_labor = Decimal::ZERO;
            let mut area_material = Decimal::ZERO;
            let mut area_gallons = 0.0_f64;
            let mut surfaces_out = Vec::new();

            for surface in &area.surfaces {
                if !surface.selected {
                    continue;
                }
                let quantity = measurement::resolve_quantity(
                    surface.mode,
                    &surface.dimensions,
                    &surface.category,
                );
                if quantity <= 0.0 {
                    continue;
                }

                let coats = surface.coats.unwrap_or(rules.default_coats);
                let labor = labor::surface_labor(
                    model,
                    rules,
                    input.tier,
                    &surface.category,
                    surface.unit,
                    quantity,
                );
                let material = if prices_materials(model, surface.unit, rules) {
                    let manual = surface.manual_gallons.then_some(surface.gallons).flatten();
                    materials::surface_material(quantity, coats, rules, manual)
                } else {
                    materials::MaterialCost::zero()
                };

                area_labor += labor.cost;
                area_material += material.total();
                area_gallons += material.gallons;
                material_raw += material.raw_cost;
                material_markup += material.markup_amount;
                if let Some(hours) = labor.estimated_hours {
                    total_hours += hours;
                }

                surfaces_out.push(SurfaceTotals {
                    category: surface.category.clone(),
                    unit: surface.unit,
                    quantity,
                    coats,
                    gallons: material.gallons,
                    labor_cents: to_cents(labor.cost),
                    material_cents: to_cents(material.total()),
                    estimated_hours: labor.estimated_hours,
                });
            }

            labor_total += area_labor;
            total_gallons += area_gallons;
            areas_out.push(AreaTotals {
                name: area.name.clone(),
                labor_cents: to_cents(area_labor),
                material_cents: to_cents(area_material),
                gallons: area_gallons,
                surfaces: surfaces_out,
            });
        }
    }

    let material_total = material_raw + material_markup;

    let subtotal_before_overhead = labor_total + material_total;
    let overhead = subtotal_before_overhead * percent(rules.overhead_percent);
    let subtotal_before_profit = subtotal_before_overhead + overhead;
    let profit = subtotal_before_profit * percent(rules.profit_margin_percent);
    let subtotal = subtotal_before_profit + profit;
    let tax = subtotal * percent(rules.tax_percent);
    let total = subtotal + tax;
    let deposit = total * percent(rules.deposit_percent);
    let balance = total - deposit;

    Ok(QuoteTotals {
        labor_total_cents: to_cents(labor_total),
        material_cost_cents: to_cents(material_raw),
        material_markup_percent: rules.material_markup_percent,
        material_markup_cents: to_cents(material_markup),
        material_total_cents: to_cents(material_total),
        overhead_percent: rules.overhead_percent,
        overhead_cents: to_cents(overhead),
        subtotal_before_profit_cents: to_cents(subtotal_before_profit),
        profit_margin_percent: rules.profit_margin_percent,
        profit_cents: to_cents(profit),
        subtotal_cents: to_cents(subtotal),
        tax_percent: rules.tax_percent,
        tax_cents: to_cents(tax),
        total_cents: to_cents(total),
        deposit_percent: rules.deposit_percent,
        deposit_cents: to_cents(deposit),
        balance_cents: to_cents(balance),
        total_gallons,
        estimated_hours: (model == PricingModel::HourlyTimeMaterials).then_some(total_hours),
        // Crew size spreads the same billable hours over the calendar; it
        // never changes what the customer pays
        estimated_duration_hours: (model == PricingModel::HourlyTimeMaterials)
            .then_some(total_hours / rules.crew_size.max(1) as f64),
        areas: areas_out,
    })
}

/// Paint volume applies only to square-foot surfaces under models that price
/// materials separately. Flat-rate and turnkey schemes bake materials into
/// their rates.
fn prices_materials(model: PricingModel, unit: MeasurementUnit, rules: &PricingRules) -> bool {
    rules.include_materials
        && unit == MeasurementUnit::Sqft
        && matches!(
            model,
            PricingModel::RateBasedSqft
                | PricingModel::ProductionBased
                | PricingModel::HourlyTimeMaterials
        )
}

fn validate(input: &QuoteInput, model: PricingModel) -> Result<(), PricingError> {
    let mut issues = Vec::new();

    if model == PricingModel::Turnkey {
        if input.home_square_footage.filter(|s| *s > 0.0).is_none() {
            issues.push(ValidationIssue {
                field: "home_square_footage".to_string(),
                message: "Turnkey pricing requires the home square footage".to_string(),
            });
        }
    } else {
        if input.areas.is_empty() {
            issues.push(ValidationIssue {
                field: "areas".to_string(),
                message: "At least one area is required".to_string(),
            });
        }
        for area in input.areas {
            let priceable = area.surfaces.iter().any(|s| {
                s.selected
                    && measurement::resolve_quantity(s.mode, &s.dimensions, &s.category) > 0.0
            });
            if !priceable {
                issues.push(ValidationIssue {
                    field: format!("areas.{}", area.name),
                    message: format!(
                        "Area '{}' has no selected surface with a measured quantity",
                        area.name
                    ),
                });
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(PricingError::Validation(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quotes::{CalcMode, Dimensions, SurfaceLineItem};

    fn surface(category: &str, mode: CalcMode, dims: Dimensions) -> SurfaceLineItem {
        SurfaceLineItem {
            category: category.to_string(),
            unit: MeasurementUnit::Sqft,
            mode,
            selected: true,
            coats: None,
            dimensions: dims,
            gallons: None,
            manual_gallons: false,
        }
    }

    fn area(name: &str, surfaces: Vec<SurfaceLineItem>) -> Area {
        Area {
            id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            job_type: JobType::Interior,
            surfaces,
            notes: None,
        }
    }

    fn input(areas: &[Area]) -> QuoteInput<'_> {
        QuoteInput {
            areas,
            job_type: JobType::Interior,
            home_square_footage: None,
            tier: None,
        }
    }

    /// Worked aggregation example: labor 1000, material 500, 10/15/8/30.
    #[test]
    fn aggregation_order_worked_example() {
        let mut rules = PricingRules {
            cost_per_gallon: 50.0,
            overhead_percent: 10.0,
            profit_margin_percent: 15.0,
            tax_percent: 8.0,
            deposit_percent: 30.0,
            ..Default::default()
        };
        rules.labor_rates.insert("Walls".to_string(), 1.0);

        let mut wall = surface("Walls", CalcMode::Area, Dimensions::Direct { area: 1000.0 });
        wall.manual_gallons = true;
        wall.gallons = Some(10.0);
        let areas = vec![area("Whole Home", vec![wall])];

        let totals =
            calculate_quote(&input(&areas), PricingModel::RateBasedSqft, &rules).unwrap();

        assert_eq!(totals.labor_total_cents, 100_000);
        assert_eq!(totals.material_total_cents, 50_000);
        assert_eq!(totals.overhead_cents, 15_000);
        assert_eq!(totals.subtotal_before_profit_cents, 165_000);
        assert_eq!(totals.profit_cents, 24_750);
        assert_eq!(totals.subtotal_cents, 189_750);
        assert_eq!(totals.tax_cents, 15_180);
        assert_eq!(totals.total_cents, 204_930);
        assert_eq!(totals.deposit_cents, 61_479);
        assert_eq!(totals.balance_cents, 143_451);
    }

    /// Room walls 12x10x8 at coverage 350 and 2 coats: 352 sqft, 2.5 gallons.
    #[test]
    fn perimeter_walls_end_to_end() {
        let mut rules = PricingRules {
            coverage_rate: 350.0,
            cost_per_gallon: 40.0,
            ..Default::default()
        };
        rules.labor_rates.insert("Walls".to_string(), 1.5);

        let dims = Dimensions::Measured {
            length: Some(12.0),
            width: Some(10.0),
            height: Some(8.0),
            linear_feet: None,
            count: None,
        };
        let areas = vec![area("Bedroom", vec![surface("Walls", CalcMode::Perimeter, dims)])];

        let totals =
            calculate_quote(&input(&areas), PricingModel::RateBasedSqft, &rules).unwrap();

        let line = &totals.areas[0].surfaces[0];
        assert_eq!(line.quantity, 352.0);
        assert_eq!(line.gallons, 2.5);
        assert_eq!(line.labor_cents, 52_800);
        assert_eq!(totals.total_gallons, 2.5);
        assert_eq!(totals.material_cost_cents, 10_000);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let mut rules = PricingRules {
            coverage_rate: 350.0,
            cost_per_gallon: 42.5,
            material_markup_percent: 18.0,
            overhead_percent: 12.5,
            profit_margin_percent: 20.0,
            tax_percent: 7.25,
            deposit_percent: 25.0,
            ..Default::default()
        };
        rules.labor_rates.insert("Walls".to_string(), 1.85);
        rules.labor_rates.insert("Ceilings".to_string(), 1.1);

        let dims = Dimensions::Measured {
            length: Some(17.0),
            width: Some(13.0),
            height: Some(9.0),
            linear_feet: None,
            count: None,
        };
        let areas = vec![area(
            "Living Room",
            vec![
                surface("Walls", CalcMode::Perimeter, dims),
                surface("Ceilings", CalcMode::Area, Dimensions::Direct { area: 221.0 }),
            ],
        )];

        let first = calculate_quote(&input(&areas), PricingModel::RateBasedSqft, &rules).unwrap();
        let second = calculate_quote(&input(&areas), PricingModel::RateBasedSqft, &rules).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn validation_names_the_offending_area() {
        let areas = vec![
            area(
                "Kitchen",
                vec![surface("Walls", CalcMode::Area, Dimensions::Direct { area: 200.0 })],
            ),
            area("Garage", vec![]),
        ];

        let err = calculate_quote(&input(&areas), PricingModel::RateBasedSqft, &PricingRules::default())
            .unwrap_err();
        let PricingError::Validation(issues) = err;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "areas.Garage");
        assert!(issues[0].message.contains("Garage"));
    }

    #[test]
    fn deselected_surfaces_fail_the_gate() {
        let mut wall = surface("Walls", CalcMode::Area, Dimensions::Direct { area: 200.0 });
        wall.selected = false;
        let areas = vec![area("Kitchen", vec![wall])];

        let err = calculate_quote(&input(&areas), PricingModel::RateBasedSqft, &PricingRules::default())
            .unwrap_err();
        let PricingError::Validation(issues) = err;
        assert_eq!(issues[0].field, "areas.Kitchen");
    }

    #[test]
    fn unselected_surfaces_do_not_contribute() {
        let mut rules = PricingRules::default();
        rules.labor_rates.insert("Walls".to_string(), 2.0);
        rules.include_materials = false;

        let mut skipped = surface("Walls", CalcMode::Area, Dimensions::Direct { area: 500.0 });
        skipped.selected = false;
        let areas = vec![area(
            "Kitchen",
            vec![
                surface("Walls", CalcMode::Area, Dimensions::Direct { area: 100.0 }),
                skipped,
            ],
        )];

        let totals =
            calculate_quote(&input(&areas), PricingModel::RateBasedSqft, &rules).unwrap();
        assert_eq!(totals.labor_total_cents, 20_000);
        assert_eq!(totals.areas[0].surfaces.len(), 1);
    }

    #[test]
    fn turnkey_requires_home_square_footage() {
        let areas = vec![];
        let err = calculate_quote(&input(&areas), PricingModel::Turnkey, &PricingRules::default())
            .unwrap_err();
        let PricingError::Validation(issues) = err;
        assert_eq!(issues[0].field, "home_square_footage");
    }

    #[test]
    fn turnkey_prices_at_aggregator_level() {
        let rules = PricingRules {
            turnkey_rate: 3.25,
            deposit_percent: 50.0,
            ..Default::default()
        };
        let quote_input = QuoteInput {
            areas: &[],
            job_type: JobType::Interior,
            home_square_footage: Some(2000.0),
            tier: None,
        };

        let totals = calculate_quote(&quote_input, PricingModel::Turnkey, &rules).unwrap();
        assert_eq!(totals.labor_total_cents, 650_000);
        assert_eq!(totals.material_total_cents, 0);
        assert_eq!(totals.total_cents, 650_000);
        assert_eq!(totals.deposit_cents, 325_000);
        assert_eq!(totals.balance_cents, 325_000);
    }

    #[test]
    fn hourly_scheme_reports_estimated_hours() {
        let mut rules = PricingRules {
            billable_labor_rate: 80.0,
            include_materials: false,
            crew_size: 2,
            ..Default::default()
        };
        rules.production_rates.insert("Walls".to_string(), 150.0);

        let areas = vec![area(
            "Hallway",
            vec![surface("Walls", CalcMode::Area, Dimensions::Direct { area: 300.0 })],
        )];

        let totals =
            calculate_quote(&input(&areas), PricingModel::HourlyTimeMaterials, &rules).unwrap();
        assert_eq!(totals.estimated_hours, Some(2.0));
        // Two painters halve the schedule, not the bill
        assert_eq!(totals.estimated_duration_hours, Some(1.0));
        assert_eq!(totals.labor_total_cents, 16_000);
    }

    #[test]
    fn flat_rate_units_skip_materials() {
        let mut rules = PricingRules {
            cost_per_gallon: 40.0,
            ..Default::default()
        };
        rules.unit_prices.insert("Doors".to_string(), 110.0);

        let mut door = surface(
            "Doors",
            CalcMode::Unit,
            Dimensions::Measured {
                length: None,
                width: None,
                height: None,
                linear_feet: None,
                count: Some(3.0),
            },
        );
        door.unit = MeasurementUnit::Unit;
        let areas = vec![area("Main Floor", vec![door])];

        let totals =
            calculate_quote(&input(&areas), PricingModel::FlatRateUnit, &rules).unwrap();
        assert_eq!(totals.labor_total_cents, 33_000);
        assert_eq!(totals.material_total_cents, 0);
        assert_eq!(totals.total_gallons, 0.0);
    }
}
