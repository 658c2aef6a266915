//! HTTP request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::market::Symbol;
use crate::domain::order::{ExecutionStyle, Side, TradeIntent};

/// A trade order as sent by clients, shared by the dry-run (query string)
/// and submission (JSON body) endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderForm {
    /// Symbol to trade.
    pub symbol: String,
    /// Order side.
    pub side: Side,
    /// Execution style.
    #[serde(default = "default_style")]
    pub style: ExecutionStyle,
    /// Quantity in lots.
    pub quantity: f64,
    /// Entry price; required for limit and stop styles.
    #[serde(default)]
    pub price: Option<f64>,
    /// Protective stop-loss level.
    #[serde(default)]
    pub stop_loss: Option<f64>,
    /// Take-profit level.
    #[serde(default)]
    pub take_profit: Option<f64>,
}

const fn default_style() -> ExecutionStyle {
    ExecutionStyle::Market
}

impl OrderForm {
    /// Convert into the domain intent.
    #[must_use]
    pub fn into_intent(self) -> TradeIntent {
        TradeIntent {
            symbol: Symbol::new(self.symbol),
            side: self.side,
            style: self.style,
            quantity: self.quantity,
            price: self.price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
        }
    }
}

/// Request to adjust protective levels on an open position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustStopForm {
    /// Position ticket.
    pub ticket: u64,
    /// New stop-loss; omit to keep the current one.
    #[serde(default)]
    pub stop_loss: Option<f64>,
    /// New take-profit; omit to keep the current one.
    #[serde(default)]
    pub take_profit: Option<f64>,
}

/// Date window for history endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryWindow {
    /// Window start (RFC 3339); defaults to 30 days before the end.
    #[serde(default)]
    pub de: Option<DateTime<Utc>>,
    /// Window end (RFC 3339); defaults to now.
    #[serde(default)]
    pub ate: Option<DateTime<Utc>>,
}

impl HistoryWindow {
    /// Default window length when no start is given.
    const DEFAULT_DAYS: i64 = 30;

    /// Resolve the window bounds.
    #[must_use]
    pub fn resolve(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let to = self.ate.unwrap_or(now);
        let from = self
            .de
            .unwrap_or_else(|| to - chrono::Duration::days(Self::DEFAULT_DAYS));
        (from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_form_defaults_to_market() {
        let form: OrderForm =
            serde_json::from_str(r#"{"symbol":"eurusd","side":"BUY","quantity":0.5}"#).unwrap();
        assert_eq!(form.style, ExecutionStyle::Market);

        let intent = form.into_intent();
        assert_eq!(intent.symbol.as_str(), "EURUSD");
        assert_eq!(intent.price, None);
    }

    #[test]
    fn order_form_parses_from_query_string() {
        let form: OrderForm = serde_urlencoded::from_str(
            "symbol=EURUSD&side=SELL&style=LIMIT&quantity=0.07&price=1.105",
        )
        .unwrap();
        assert_eq!(form.side, Side::Sell);
        assert_eq!(form.style, ExecutionStyle::Limit);
        assert_eq!(form.price, Some(1.105));
    }

    #[test]
    fn history_window_defaults() {
        let now = Utc::now();
        let window = HistoryWindow { de: None, ate: None };
        let (from, to) = window.resolve(now);
        assert_eq!(to, now);
        assert_eq!(to - from, chrono::Duration::days(30));
    }
}
