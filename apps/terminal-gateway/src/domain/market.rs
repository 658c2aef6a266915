//! Market snapshots: symbols, trading constraints and quotes.
//!
//! Constraints and quotes are immutable snapshots fetched fresh for every
//! request. Staleness is the terminal's concern; nothing here is cached.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::order::Side;

/// A terminal symbol identifier ("EURUSD", "PETR4", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Maximum accepted symbol length.
    const MAX_LEN: usize = 32;

    /// Create a new symbol, normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate the symbol for use in a terminal request.
    ///
    /// # Errors
    ///
    /// Returns a message when the symbol is empty, too long, or contains
    /// whitespace or non-printable characters.
    pub fn validate(&self) -> Result<(), String> {
        if self.0.is_empty() {
            return Err("symbol cannot be empty".to_string());
        }
        if self.0.len() > Self::MAX_LEN {
            return Err("symbol exceeds maximum length".to_string());
        }
        if !self.0.chars().all(|c| c.is_ascii_graphic()) {
            return Err("symbol contains invalid characters".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trading constraints for a symbol, as reported by the terminal.
///
/// Fields the terminal does not report arrive as `None`. A zero tick size is
/// equivalent to an unknown one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConstraints {
    /// Minimum tradeable volume in lots.
    pub min_volume: Option<f64>,
    /// Maximum tradeable volume in lots.
    pub max_volume: Option<f64>,
    /// Smallest valid volume increment above the minimum.
    pub volume_step: Option<f64>,
    /// Smallest valid price increment.
    pub tick_size: Option<f64>,
    /// Minimum stop distance, expressed in ticks. Zero means unrestricted.
    pub min_stop_distance_ticks: u32,
}

impl SymbolConstraints {
    /// The tick size, if known and usable.
    #[must_use]
    pub fn usable_tick(&self) -> Option<f64> {
        self.tick_size.filter(|t| t.is_finite() && *t > 0.0)
    }

    /// Minimum stop distance in price units, or `None` when unrestricted.
    #[must_use]
    pub fn min_stop_distance(&self) -> Option<f64> {
        if self.min_stop_distance_ticks == 0 {
            return None;
        }
        self.usable_tick()
            .map(|tick| f64::from(self.min_stop_distance_ticks) * tick)
    }

    /// Round a price to the nearest valid tick for this symbol.
    #[must_use]
    pub fn normalize(&self, price: f64) -> f64 {
        normalize_price(price, self.tick_size)
    }
}

/// A bid/ask snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Best bid.
    pub bid: f64,
    /// Best ask.
    pub ask: f64,
}

impl Quote {
    /// The price a market order on the given side would deal at.
    ///
    /// Buys lift the ask, sells hit the bid.
    #[must_use]
    pub const fn side_price(&self, side: Side) -> f64 {
        match side {
            Side::Buy => self.ask,
            Side::Sell => self.bid,
        }
    }
}

/// Round a price to the nearest integer multiple of the tick size.
///
/// A zero or unknown tick size leaves the price unchanged. The operation is
/// idempotent within floating-point tolerance.
#[must_use]
pub fn normalize_price(price: f64, tick_size: Option<f64>) -> f64 {
    match tick_size {
        Some(tick) if tick.is_finite() && tick > 0.0 => (price / tick).round() * tick,
        _ => price,
    }
}
