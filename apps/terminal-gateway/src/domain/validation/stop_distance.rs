//! Stop-loss / take-profit placement validation.
//!
//! Both levels are optional; each supplied level must sit on the protective
//! side of the reference price and at least the symbol's minimum stop
//! distance away. When the symbol reports no stop restriction (zero tick
//! count or unknown tick size) the whole rule is skipped.

use super::RejectReason;
use crate::domain::market::SymbolConstraints;
use crate::domain::order::{OrderKind, Side};

/// Check protective levels against the reference price.
///
/// The reference is the quote side a market order would deal at, or the
/// normalized entry price for resting orders.
pub fn check(
    kind: OrderKind,
    reference: f64,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    constraints: &SymbolConstraints,
) -> Result<(), RejectReason> {
    let Some(min_distance) = constraints.min_stop_distance() else {
        return Ok(());
    };

    if let Some(sl) = stop_loss {
        // A stop-loss protects against adverse movement: below the
        // reference for buys, above it for sells.
        let distance = match kind.side() {
            Side::Buy => reference - sl,
            Side::Sell => sl - reference,
        };
        if distance <= 0.0 {
            return Err(RejectReason::StopOnWrongSide {
                stop_loss: sl,
                reference,
            });
        }
        if distance < min_distance {
            return Err(RejectReason::StopTooClose {
                distance,
                minimum: min_distance,
            });
        }
    }

    if let Some(tp) = take_profit {
        let distance = match kind.side() {
            Side::Buy => tp - reference,
            Side::Sell => reference - tp,
        };
        if distance <= 0.0 {
            return Err(RejectReason::TakeProfitOnWrongSide {
                take_profit: tp,
                reference,
            });
        }
        if distance < min_distance {
            return Err(RejectReason::TakeProfitTooClose {
                distance,
                minimum: min_distance,
            });
        }
    }

    Ok(())
}
