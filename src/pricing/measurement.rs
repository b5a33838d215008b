//! Measurement resolver
//!
//! Converts user-entered dimensions for a surface into a single quantity in
//! the surface's native unit (square feet, linear feet, or a unit count).
//! Absent or non-numeric inputs count as zero; negative results are passed
//! through and rejected later by the aggregator's validation gate.

use crate::domain::quotes::{CalcMode, Dimensions};

/// Resolve a surface's dimensions into a quantity under its calculation mode.
///
/// A direct entry short-circuits every mode: the user typed the quantity and
/// we take it literally.
pub fn resolve_quantity(mode: CalcMode, dims: &Dimensions, category: &str) -> f64 {
    let (length, width, height, linear_feet, count) = match *dims {
        Dimensions::Direct { area } => {
            return if area.is_finite() { area } else { 0.0 };
        }
        Dimensions::Measured {
            length,
            width,
            height,
            linear_feet,
            count,
        } => (num(length), num(width), num(height), num(linear_feet), num(count)),
    };

    match mode {
        // Four walls around the room footprint, or a single wall when only
        // length and height are known.
        CalcMode::Perimeter => match (length, width, height) {
            (Some(l), Some(w), Some(h)) => 2.0 * (l + w) * h,
            (Some(l), None, Some(h)) => l * h,
            _ => 0.0,
        },
        CalcMode::Area => match (length, width) {
            (Some(l), Some(w)) => l * w,
            _ => 0.0,
        },
        CalcMode::Linear => {
            if let Some(lf) = linear_feet {
                // Fences are priced on face area, not run length
                if fence_like(category) {
                    if let Some(h) = height {
                        return lf * h;
                    }
                }
                lf
            } else if length.is_some() || width.is_some() {
                // Trim fallback: approximate run length from the room perimeter
                2.0 * (length.unwrap_or(0.0) + width.unwrap_or(0.0))
            } else {
                0.0
            }
        }
        CalcMode::Unit => match count {
            // Doors and similar openings can carry a face size per unit
            Some(c) => match (height, width) {
                (Some(h), Some(w)) => c * h * w,
                _ => c,
            },
            None => 0.0,
        },
    }
}

fn num(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

fn fence_like(category: &str) -> bool {
    category.to_ascii_lowercase().contains("fence")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(
        length: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
        linear_feet: Option<f64>,
        count: Option<f64>,
    ) -> Dimensions {
        Dimensions::Measured {
            length,
            width,
            height,
            linear_feet,
            count,
        }
    }

    #[test]
    fn perimeter_walls_from_room_footprint() {
        let dims = measured(Some(12.0), Some(10.0), Some(8.0), None, None);
        assert_eq!(resolve_quantity(CalcMode::Perimeter, &dims, "Walls"), 352.0);
    }

    #[test]
    fn perimeter_single_wall_when_width_missing() {
        let dims = measured(Some(20.0), None, Some(9.0), None, None);
        assert_eq!(resolve_quantity(CalcMode::Perimeter, &dims, "Accent Wall"), 180.0);
    }

    #[test]
    fn perimeter_incomplete_measurements_resolve_to_zero() {
        let dims = measured(Some(12.0), Some(10.0), None, None, None);
        assert_eq!(resolve_quantity(CalcMode::Perimeter, &dims, "Walls"), 0.0);
    }

    #[test]
    fn area_is_length_times_width() {
        let dims = measured(Some(15.0), Some(12.0), None, None, None);
        assert_eq!(resolve_quantity(CalcMode::Area, &dims, "Ceiling"), 180.0);
    }

    #[test]
    fn linear_uses_entered_run_length() {
        let dims = measured(None, None, None, Some(64.0), None);
        assert_eq!(resolve_quantity(CalcMode::Linear, &dims, "Baseboard"), 64.0);
    }

    #[test]
    fn linear_fence_multiplies_by_height() {
        let dims = measured(None, None, Some(6.0), Some(100.0), None);
        assert_eq!(resolve_quantity(CalcMode::Linear, &dims, "Privacy Fence"), 600.0);
    }

    #[test]
    fn linear_falls_back_to_room_perimeter() {
        let dims = measured(Some(12.0), Some(10.0), None, None, None);
        assert_eq!(resolve_quantity(CalcMode::Linear, &dims, "Crown Molding"), 44.0);
    }

    #[test]
    fn unit_is_plain_count() {
        let dims = measured(None, None, None, None, Some(4.0));
        assert_eq!(resolve_quantity(CalcMode::Unit, &dims, "Doors"), 4.0);
    }

    #[test]
    fn unit_with_face_size_gives_total_area() {
        let dims = measured(None, Some(3.0), Some(7.0), None, Some(4.0));
        assert_eq!(resolve_quantity(CalcMode::Unit, &dims, "Doors"), 84.0);
    }

    #[test]
    fn direct_entry_wins_over_mode() {
        let dims = Dimensions::Direct { area: 275.5 };
        assert_eq!(resolve_quantity(CalcMode::Perimeter, &dims, "Walls"), 275.5);
        assert_eq!(resolve_quantity(CalcMode::Unit, &dims, "Doors"), 275.5);
    }

    #[test]
    fn non_numeric_inputs_count_as_absent() {
        let dims = measured(Some(f64::NAN), Some(10.0), Some(8.0), None, None);
        assert_eq!(resolve_quantity(CalcMode::Perimeter, &dims, "Walls"), 0.0);

        let direct = Dimensions::Direct { area: f64::INFINITY };
        assert_eq!(resolve_quantity(CalcMode::Area, &direct, "Walls"), 0.0);
    }

    #[test]
    fn negative_measurements_pass_through() {
        // The aggregator's validation gate rejects non-positive quantities;
        // the resolver itself does not.
        let dims = measured(Some(-12.0), Some(10.0), Some(8.0), None, None);
        assert_eq!(resolve_quantity(CalcMode::Perimeter, &dims, "Walls"), -32.0);
    }
}
