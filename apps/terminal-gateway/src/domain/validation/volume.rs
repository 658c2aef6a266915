//! Volume validation against a symbol's min/max/step constraints.

use super::RejectReason;
use crate::domain::market::SymbolConstraints;

/// Tolerance when checking that a quantity sits on the volume grid.
pub const STEP_TOLERANCE: f64 = 1e-6;

/// Check a requested quantity against the symbol's volume constraints.
///
/// Rules run in order and the first violation wins:
/// 1. min, max and step must all be known, finite, with a positive step —
///    otherwise the constraints themselves are unusable.
/// 2. quantity below the minimum.
/// 3. quantity above the maximum.
/// 4. (quantity − min) must be an integer multiple of step within
///    [`STEP_TOLERANCE`].
pub fn check(quantity: f64, constraints: &SymbolConstraints) -> Result<(), RejectReason> {
    let (Some(min), Some(max), Some(step)) = (
        constraints.min_volume,
        constraints.max_volume,
        constraints.volume_step,
    ) else {
        return Err(RejectReason::ConstraintsUnavailable);
    };

    // A zero or negative step would make the grid check divide by nothing;
    // malformed constraints are reported as unavailable, not as a panic.
    if !min.is_finite() || !max.is_finite() || !step.is_finite() || step <= 0.0 {
        return Err(RejectReason::ConstraintsUnavailable);
    }

    if quantity < min {
        return Err(RejectReason::BelowMinimum {
            quantity,
            minimum: min,
        });
    }
    if quantity > max {
        return Err(RejectReason::AboveMaximum {
            quantity,
            maximum: max,
        });
    }

    let steps = (quantity - min) / step;
    let remainder = (quantity - min) - steps.round() * step;
    if remainder.abs() > STEP_TOLERANCE {
        return Err(RejectReason::InvalidStep { quantity, step });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn constraints() -> SymbolConstraints {
        SymbolConstraints {
            min_volume: Some(0.01),
            max_volume: Some(10.0),
            volume_step: Some(0.01),
            tick_size: Some(0.000_01),
            min_stop_distance_ticks: 100,
        }
    }

    #[test_case(0.01; "exact minimum")]
    #[test_case(0.07; "mid-range on the grid")]
    #[test_case(0.5; "half lot")]
    #[test_case(10.0; "exact maximum")]
    fn accepts_quantities_on_the_grid(quantity: f64) {
        assert_eq!(check(quantity, &constraints()), Ok(()));
    }

    #[test_case(0.005; "below minimum")]
    #[test_case(0.0; "zero")]
    fn rejects_below_minimum(quantity: f64) {
        assert!(matches!(
            check(quantity, &constraints()),
            Err(RejectReason::BelowMinimum { .. })
        ));
    }

    #[test]
    fn rejects_above_maximum() {
        assert!(matches!(
            check(10.01, &constraints()),
            Err(RejectReason::AboveMaximum { .. })
        ));
    }

    #[test_case(0.075; "between grid points")]
    #[test_case(0.013; "three tenths of a step off")]
    fn rejects_off_grid_quantities(quantity: f64) {
        assert!(matches!(
            check(quantity, &constraints()),
            Err(RejectReason::InvalidStep { .. })
        ));
    }

    #[test]
    fn tolerates_floating_point_noise_on_the_grid() {
        // 0.01 + 29 * 0.01 accumulated in floating point is not exactly 0.30.
        let mut quantity = 0.01_f64;
        for _ in 0..29 {
            quantity += 0.01;
        }
        assert_eq!(check(quantity, &constraints()), Ok(()));
    }

    #[test]
    fn rejects_when_any_bound_is_unknown() {
        for strip in 0..3 {
            let mut c = constraints();
            match strip {
                0 => c.min_volume = None,
                1 => c.max_volume = None,
                _ => c.volume_step = None,
            }
            assert_eq!(
                check(0.5, &c),
                Err(RejectReason::ConstraintsUnavailable),
                "stripped field {strip}"
            );
        }
    }

    #[test]
    fn rejects_zero_or_negative_step_as_unavailable() {
        let mut c = constraints();
        c.volume_step = Some(0.0);
        assert_eq!(check(0.5, &c), Err(RejectReason::ConstraintsUnavailable));

        c.volume_step = Some(-0.01);
        assert_eq!(check(0.5, &c), Err(RejectReason::ConstraintsUnavailable));
    }
}
