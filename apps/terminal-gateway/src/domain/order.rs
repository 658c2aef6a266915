//! Trade intents and the order-kind taxonomy.
//!
//! An intent is what the client asked for; an [`OrderKind`] is the derived
//! six-way taxonomy (side × execution style) that every validation rule and
//! the request builder match on exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::market::Symbol;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Execution style requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStyle {
    /// Immediate execution at the current quote.
    Market,
    /// Resting order at a price at least as good as the current quote.
    Limit,
    /// Resting order triggered once price moves past the current quote.
    Stop,
}

impl ExecutionStyle {
    /// Returns true if this style requires an explicit entry price.
    #[must_use]
    pub const fn requires_price(&self) -> bool {
        matches!(self, Self::Limit | Self::Stop)
    }
}

impl fmt::Display for ExecutionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::Stop => write!(f, "STOP"),
        }
    }
}

/// The six concrete order kinds the terminal understands.
///
/// Derived deterministically from (side, style); never constructed from
/// strings so a new execution style cannot silently fall through to a wrong
/// rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    /// Immediate buy at the ask.
    BuyMarket,
    /// Immediate sell at the bid.
    SellMarket,
    /// Resting buy at or below the ask.
    BuyLimit,
    /// Resting sell at or above the bid.
    SellLimit,
    /// Resting buy triggered at or above the ask.
    BuyStop,
    /// Resting sell triggered at or below the bid.
    SellStop,
}

impl OrderKind {
    /// Derive the kind from side and execution style.
    #[must_use]
    pub const fn of(side: Side, style: ExecutionStyle) -> Self {
        match (side, style) {
            (Side::Buy, ExecutionStyle::Market) => Self::BuyMarket,
            (Side::Sell, ExecutionStyle::Market) => Self::SellMarket,
            (Side::Buy, ExecutionStyle::Limit) => Self::BuyLimit,
            (Side::Sell, ExecutionStyle::Limit) => Self::SellLimit,
            (Side::Buy, ExecutionStyle::Stop) => Self::BuyStop,
            (Side::Sell, ExecutionStyle::Stop) => Self::SellStop,
        }
    }

    /// The side component of this kind.
    #[must_use]
    pub const fn side(&self) -> Side {
        match self {
            Self::BuyMarket | Self::BuyLimit | Self::BuyStop => Side::Buy,
            Self::SellMarket | Self::SellLimit | Self::SellStop => Side::Sell,
        }
    }

    /// The execution-style component of this kind.
    #[must_use]
    pub const fn style(&self) -> ExecutionStyle {
        match self {
            Self::BuyMarket | Self::SellMarket => ExecutionStyle::Market,
            Self::BuyLimit | Self::SellLimit => ExecutionStyle::Limit,
            Self::BuyStop | Self::SellStop => ExecutionStyle::Stop,
        }
    }

    /// Returns true for immediate (market) kinds.
    #[must_use]
    pub const fn is_market(&self) -> bool {
        matches!(self, Self::BuyMarket | Self::SellMarket)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuyMarket => write!(f, "BUY_MARKET"),
            Self::SellMarket => write!(f, "SELL_MARKET"),
            Self::BuyLimit => write!(f, "BUY_LIMIT"),
            Self::SellLimit => write!(f, "SELL_LIMIT"),
            Self::BuyStop => write!(f, "BUY_STOP"),
            Self::SellStop => write!(f, "SELL_STOP"),
        }
    }
}

/// Structural defects in a trade intent, caught before any terminal call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntentError {
    /// A limit or stop intent arrived without an entry price.
    #[error("{style} orders require an entry price")]
    MissingEntryPrice {
        /// The execution style that was requested.
        style: ExecutionStyle,
    },

    /// Quantity must be strictly positive.
    #[error("quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The offending quantity.
        quantity: f64,
    },

    /// A numeric field was NaN or infinite.
    #[error("field '{field}' is not a finite number")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The symbol identifier is unusable.
    #[error("invalid symbol: {message}")]
    InvalidSymbol {
        /// What is wrong with it.
        message: String,
    },
}

/// A client's trade intent, as received from the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Buy or sell.
    pub side: Side,
    /// Market, limit or stop.
    pub style: ExecutionStyle,
    /// Requested quantity in lots.
    pub quantity: f64,
    /// Entry price; required for limit and stop styles.
    pub price: Option<f64>,
    /// Optional protective stop-loss level.
    pub stop_loss: Option<f64>,
    /// Optional take-profit level.
    pub take_profit: Option<f64>,
}

impl TradeIntent {
    /// The derived order kind for this intent.
    #[must_use]
    pub const fn kind(&self) -> OrderKind {
        OrderKind::of(self.side, self.style)
    }

    /// Check structural invariants.
    ///
    /// This is the cheapest failure path and runs before any terminal call:
    /// the quantity must be a positive finite number, limit/stop intents must
    /// carry an entry price, and every supplied price level must be finite.
    pub fn check_shape(&self) -> Result<(), IntentError> {
        self.symbol
            .validate()
            .map_err(|message| IntentError::InvalidSymbol { message })?;
        if !self.quantity.is_finite() {
            return Err(IntentError::NonFinite { field: "quantity" });
        }
        if self.quantity <= 0.0 {
            return Err(IntentError::NonPositiveQuantity {
                quantity: self.quantity,
            });
        }
        match self.price {
            None if self.style.requires_price() => {
                return Err(IntentError::MissingEntryPrice { style: self.style });
            }
            Some(p) if !p.is_finite() => {
                return Err(IntentError::NonFinite { field: "price" });
            }
            _ => {}
        }
        if self.stop_loss.is_some_and(|p| !p.is_finite()) {
            return Err(IntentError::NonFinite { field: "stop_loss" });
        }
        if self.take_profit.is_some_and(|p| !p.is_finite()) {
            return Err(IntentError::NonFinite { field: "take_profit" });
        }
        Ok(())
    }

    /// Returns true if the intent carries at least one protective level.
    #[must_use]
    pub const fn has_protective_levels(&self) -> bool {
        self.stop_loss.is_some() || self.take_profit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market_buy(quantity: f64) -> TradeIntent {
        TradeIntent {
            symbol: Symbol::new("EURUSD"),
            side: Side::Buy,
            style: ExecutionStyle::Market,
            quantity,
            price: None,
            stop_loss: None,
            take_profit: None,
        }
    }

    #[test]
    fn kind_covers_all_side_style_combinations() {
        assert_eq!(
            OrderKind::of(Side::Buy, ExecutionStyle::Market),
            OrderKind::BuyMarket
        );
        assert_eq!(
            OrderKind::of(Side::Sell, ExecutionStyle::Market),
            OrderKind::SellMarket
        );
        assert_eq!(
            OrderKind::of(Side::Buy, ExecutionStyle::Limit),
            OrderKind::BuyLimit
        );
        assert_eq!(
            OrderKind::of(Side::Sell, ExecutionStyle::Limit),
            OrderKind::SellLimit
        );
        assert_eq!(
            OrderKind::of(Side::Buy, ExecutionStyle::Stop),
            OrderKind::BuyStop
        );
        assert_eq!(
            OrderKind::of(Side::Sell, ExecutionStyle::Stop),
            OrderKind::SellStop
        );
    }

    #[test]
    fn kind_roundtrips_side_and_style() {
        for side in [Side::Buy, Side::Sell] {
            for style in [
                ExecutionStyle::Market,
                ExecutionStyle::Limit,
                ExecutionStyle::Stop,
            ] {
                let kind = OrderKind::of(side, style);
                assert_eq!(kind.side(), side);
                assert_eq!(kind.style(), style);
            }
        }
    }

    #[test]
    fn side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn shape_rejects_non_positive_quantity() {
        assert!(matches!(
            market_buy(0.0).check_shape(),
            Err(IntentError::NonPositiveQuantity { .. })
        ));
        assert!(matches!(
            market_buy(-1.0).check_shape(),
            Err(IntentError::NonPositiveQuantity { .. })
        ));
    }

    #[test]
    fn shape_rejects_nan_quantity() {
        assert!(matches!(
            market_buy(f64::NAN).check_shape(),
            Err(IntentError::NonFinite { field: "quantity" })
        ));
    }

    #[test]
    fn shape_requires_price_for_pending_styles() {
        let mut intent = market_buy(0.1);
        intent.style = ExecutionStyle::Limit;
        assert_eq!(
            intent.check_shape(),
            Err(IntentError::MissingEntryPrice {
                style: ExecutionStyle::Limit
            })
        );

        intent.style = ExecutionStyle::Stop;
        assert!(matches!(
            intent.check_shape(),
            Err(IntentError::MissingEntryPrice { .. })
        ));

        intent.price = Some(1.2345);
        assert!(intent.check_shape().is_ok());
    }

    #[test]
    fn shape_accepts_market_without_price() {
        assert!(market_buy(0.5).check_shape().is_ok());
    }

    #[test]
    fn shape_rejects_infinite_levels() {
        let mut intent = market_buy(0.5);
        intent.stop_loss = Some(f64::INFINITY);
        assert!(matches!(
            intent.check_shape(),
            Err(IntentError::NonFinite { field: "stop_loss" })
        ));
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&OrderKind::BuyLimit).unwrap();
        assert_eq!(json, "\"BUY_LIMIT\"");

        let side: Side = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(side, Side::Sell);
    }
}
