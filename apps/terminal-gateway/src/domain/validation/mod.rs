//! Order admissibility: rejection reasons, verdicts and the orchestrator.
//!
//! The orchestrator walks a fixed sequence — volume, entry price (resting
//! orders only), protective levels — and stops at the first violation. A
//! verdict is never cached: callers re-validate immediately before
//! submission because the quote and constraints may have moved.

pub mod entry_price;
pub mod stop_distance;
pub mod volume;

use serde::{Deserialize, Serialize};

use super::market::{Quote, SymbolConstraints, normalize_price};
use super::order::{IntentError, TradeIntent};

/// The first rule an order violated.
///
/// Exactly one reason is ever reported; the sequence short-circuits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectReason {
    /// The symbol's volume constraints are missing or malformed.
    #[error("volume constraints for this symbol are unavailable")]
    ConstraintsUnavailable,

    /// Quantity below the symbol minimum.
    #[error("quantity {quantity} is below the minimum volume {minimum}")]
    BelowMinimum {
        /// Requested quantity.
        quantity: f64,
        /// Symbol minimum volume.
        minimum: f64,
    },

    /// Quantity above the symbol maximum.
    #[error("quantity {quantity} is above the maximum volume {maximum}")]
    AboveMaximum {
        /// Requested quantity.
        quantity: f64,
        /// Symbol maximum volume.
        maximum: f64,
    },

    /// Quantity does not sit on the volume grid.
    #[error("quantity {quantity} is not a multiple of the volume step {step}")]
    InvalidStep {
        /// Requested quantity.
        quantity: f64,
        /// Symbol volume step.
        step: f64,
    },

    /// No quote was available when one was required.
    #[error("no quote is available for this symbol")]
    NoQuote,

    /// Buy limit priced above the ask.
    #[error("limit price {price} is above the ask {ask}")]
    LimitPriceTooHigh {
        /// Normalized entry price.
        price: f64,
        /// Current ask.
        ask: f64,
    },

    /// Sell limit priced below the bid.
    #[error("limit price {price} is below the bid {bid}")]
    LimitPriceTooLow {
        /// Normalized entry price.
        price: f64,
        /// Current bid.
        bid: f64,
    },

    /// Buy stop priced below the ask.
    #[error("stop price {price} is below the ask {ask}")]
    StopPriceTooLow {
        /// Normalized entry price.
        price: f64,
        /// Current ask.
        ask: f64,
    },

    /// Sell stop priced above the bid.
    #[error("stop price {price} is above the bid {bid}")]
    StopPriceTooHigh {
        /// Normalized entry price.
        price: f64,
        /// Current bid.
        bid: f64,
    },

    /// Stop-loss on the unprotective side of the reference price.
    #[error("stop loss {stop_loss} is on the wrong side of the reference price {reference}")]
    StopOnWrongSide {
        /// Supplied stop-loss.
        stop_loss: f64,
        /// Reference price.
        reference: f64,
    },

    /// Stop-loss closer than the symbol allows.
    #[error("stop loss distance {distance} is below the minimum {minimum}")]
    StopTooClose {
        /// Observed distance.
        distance: f64,
        /// Minimum required distance.
        minimum: f64,
    },

    /// Take-profit on the wrong side of the reference price.
    #[error("take profit {take_profit} is on the wrong side of the reference price {reference}")]
    TakeProfitOnWrongSide {
        /// Supplied take-profit.
        take_profit: f64,
        /// Reference price.
        reference: f64,
    },

    /// Take-profit closer than the symbol allows.
    #[error("take profit distance {distance} is below the minimum {minimum}")]
    TakeProfitTooClose {
        /// Observed distance.
        distance: f64,
        /// Minimum required distance.
        minimum: f64,
    },
}

impl RejectReason {
    /// Stable machine-readable code for this reason.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConstraintsUnavailable => "CONSTRAINTS_UNAVAILABLE",
            Self::BelowMinimum { .. } => "BELOW_MINIMUM",
            Self::AboveMaximum { .. } => "ABOVE_MAXIMUM",
            Self::InvalidStep { .. } => "INVALID_STEP",
            Self::NoQuote => "NO_QUOTE",
            Self::LimitPriceTooHigh { .. } => "LIMIT_PRICE_TOO_HIGH",
            Self::LimitPriceTooLow { .. } => "LIMIT_PRICE_TOO_LOW",
            Self::StopPriceTooLow { .. } => "STOP_PRICE_TOO_LOW",
            Self::StopPriceTooHigh { .. } => "STOP_PRICE_TOO_HIGH",
            Self::StopOnWrongSide { .. } => "STOP_ON_WRONG_SIDE",
            Self::StopTooClose { .. } => "STOP_TOO_CLOSE",
            Self::TakeProfitOnWrongSide { .. } => "TAKE_PROFIT_ON_WRONG_SIDE",
            Self::TakeProfitTooClose { .. } => "TAKE_PROFIT_TOO_CLOSE",
        }
    }
}

/// The orchestrator's sole output.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationVerdict {
    /// Whether the order may be submitted.
    pub admissible: bool,
    /// The first violated rule, when not admissible.
    pub reason: Option<RejectReason>,
    /// Echo of the constraints the decision was made against.
    pub constraints: SymbolConstraints,
}

impl ValidationVerdict {
    /// An admissible verdict.
    #[must_use]
    pub const fn admissible(constraints: SymbolConstraints) -> Self {
        Self {
            admissible: true,
            reason: None,
            constraints,
        }
    }

    /// A rejected verdict carrying the first violated rule.
    #[must_use]
    pub const fn rejected(reason: RejectReason, constraints: SymbolConstraints) -> Self {
        Self {
            admissible: false,
            reason: Some(reason),
            constraints,
        }
    }
}

/// Decide whether a trade intent is admissible.
///
/// Pure given its inputs; the caller resolves constraints and quote fresh
/// for every request. The quote may be absent — rules that need one reject
/// with [`RejectReason::NoQuote`], rules that don't still run.
///
/// # Errors
///
/// Returns [`IntentError`] for structurally invalid intents; those are
/// transport-level (400) failures, not market verdicts.
pub fn validate_order(
    intent: &TradeIntent,
    constraints: &SymbolConstraints,
    quote: Option<&Quote>,
) -> Result<ValidationVerdict, IntentError> {
    intent.check_shape()?;
    let kind = intent.kind();

    if let Err(reason) = volume::check(intent.quantity, constraints) {
        return Ok(ValidationVerdict::rejected(reason, constraints.clone()));
    }

    // Resting orders carry an entry price; it doubles as the stop-distance
    // reference once normalized.
    let entry = if kind.is_market() {
        None
    } else {
        let raw = intent
            .price
            .ok_or(IntentError::MissingEntryPrice { style: intent.style })?;
        let price = normalize_price(raw, constraints.tick_size);
        let Some(quote) = quote else {
            return Ok(ValidationVerdict::rejected(
                RejectReason::NoQuote,
                constraints.clone(),
            ));
        };
        if let Err(reason) = entry_price::check(kind, price, quote) {
            return Ok(ValidationVerdict::rejected(reason, constraints.clone()));
        }
        Some(price)
    };

    if intent.has_protective_levels() {
        let reference = match entry {
            Some(price) => price,
            None => match quote {
                Some(quote) => quote.side_price(intent.side),
                None => {
                    return Ok(ValidationVerdict::rejected(
                        RejectReason::NoQuote,
                        constraints.clone(),
                    ));
                }
            },
        };
        if let Err(reason) = stop_distance::check(
            kind,
            reference,
            intent.stop_loss,
            intent.take_profit,
            constraints,
        ) {
            return Ok(ValidationVerdict::rejected(reason, constraints.clone()));
        }
    }

    Ok(ValidationVerdict::admissible(constraints.clone()))
}

/// Serialized form of a rejection, used by transport layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionDetail {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

impl From<&RejectReason> for RejectionDetail {
    fn from(reason: &RejectReason) -> Self {
        Self {
            code: reason.code().to_string(),
            message: reason.to_string(),
        }
    }
}
