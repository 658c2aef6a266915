//! Terminal Port (Driven Port)
//!
//! Contract with the remote trading terminal. Everything the gateway knows
//! about connectivity, account state, live prices and order execution comes
//! through this trait; the core treats each call as fallible and never
//! retries at this layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::market::{Quote, Symbol, SymbolConstraints};
use crate::domain::order::{OrderKind, Side};
use crate::domain::request::OrderRequest;

/// Terminal connectivity plus an account summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalStatus {
    /// Whether the terminal is connected to its trade server.
    pub connected: bool,
    /// Whether the account allows trading.
    pub trade_allowed: bool,
    /// Trade server name, if reported.
    pub server: Option<String>,
    /// Last measured ping to the trade server, in milliseconds.
    pub ping_ms: Option<u32>,
    /// Account summary, absent when no account is logged in.
    pub account: Option<AccountSummary>,
}

/// Snapshot of the logged-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account login number.
    pub login: u64,
    /// Account holder name.
    pub name: String,
    /// Balance in account currency.
    pub balance: f64,
    /// Equity in account currency.
    pub equity: f64,
    /// Account currency code.
    pub currency: String,
}

/// A full price tick (richer than the bid/ask [`Quote`] the core needs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    /// Best bid.
    pub bid: f64,
    /// Best ask.
    pub ask: f64,
    /// Last traded price.
    pub last: f64,
    /// Tick timestamp.
    pub time: DateTime<Utc>,
}

impl Tick {
    /// The bid/ask pair the validation core consumes.
    #[must_use]
    pub const fn quote(&self) -> Quote {
        Quote {
            bid: self.bid,
            ask: self.ask,
        }
    }
}

/// Daily low/high for a symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyRange {
    /// Session low.
    pub low: f64,
    /// Session high.
    pub high: f64,
}

/// An open position as reported by the terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionInfo {
    /// Position ticket.
    pub ticket: u64,
    /// Symbol.
    pub symbol: String,
    /// Position side.
    pub side: Side,
    /// Volume in lots.
    pub volume: f64,
    /// Open price.
    pub open_price: f64,
    /// Current protective stop-loss, if set.
    pub stop_loss: Option<f64>,
    /// Current take-profit, if set.
    pub take_profit: Option<f64>,
    /// Floating profit in account currency.
    pub profit: f64,
}

/// A working pending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrderInfo {
    /// Order ticket.
    pub ticket: u64,
    /// Symbol.
    pub symbol: String,
    /// Concrete order kind.
    pub kind: OrderKind,
    /// Remaining volume in lots.
    pub volume: f64,
    /// Resting price.
    pub price: f64,
    /// Protective stop-loss, if set.
    pub stop_loss: Option<f64>,
    /// Take-profit, if set.
    pub take_profit: Option<f64>,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}

/// A historical (finished) order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalOrder {
    /// Order ticket.
    pub ticket: u64,
    /// Symbol.
    pub symbol: String,
    /// Concrete order kind.
    pub kind: OrderKind,
    /// Ordered volume in lots.
    pub volume: f64,
    /// Order price.
    pub price: f64,
    /// Terminal state string (filled, cancelled, ...).
    pub state: String,
    /// When the order reached its final state.
    pub done_at: DateTime<Utc>,
}

/// A historical executed deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalDeal {
    /// Deal ticket.
    pub ticket: u64,
    /// Originating order ticket.
    pub order: u64,
    /// Symbol.
    pub symbol: String,
    /// Deal side.
    pub side: Side,
    /// Executed volume in lots.
    pub volume: f64,
    /// Execution price.
    pub price: f64,
    /// Realized profit in account currency.
    pub profit: f64,
    /// Execution time.
    pub time: DateTime<Utc>,
}

/// Raw acknowledgement of a submitted request.
///
/// Passed back to clients unmodified, including terminal-side rejections
/// encoded in `retcode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAck {
    /// Terminal return code.
    pub retcode: u32,
    /// Deal ticket, when a deal was executed.
    pub deal: u64,
    /// Order ticket, when an order was placed.
    pub order: u64,
    /// Executed volume.
    pub volume: f64,
    /// Execution price.
    pub price: f64,
    /// Bid at execution time.
    pub bid: f64,
    /// Ask at execution time.
    pub ask: f64,
    /// Terminal comment.
    pub comment: String,
    /// Terminal request id.
    pub request_id: u64,
}

/// Terminal port error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TerminalError {
    /// The symbol does not exist on this trade server.
    #[error("symbol {symbol} is not known to the terminal")]
    SymbolNotFound {
        /// The missing symbol.
        symbol: String,
    },

    /// No position with the given ticket.
    #[error("position {ticket} not found")]
    PositionNotFound {
        /// The missing ticket.
        ticket: u64,
    },

    /// The terminal (or the bridge in front of it) could not be reached or
    /// could not produce the data.
    #[error("terminal unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The terminal actively refused the request.
    #[error("terminal rejected the request: {code} - {message}")]
    Rejected {
        /// Terminal error code.
        code: String,
        /// Terminal error message.
        message: String,
    },
}

/// Port for all terminal interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TerminalPort: Send + Sync {
    /// Terminal connectivity and account snapshot.
    async fn status(&self) -> Result<TerminalStatus, TerminalError>;

    /// Check the symbol exists and make it visible for trading.
    async fn ensure_symbol(&self, symbol: &Symbol) -> Result<(), TerminalError>;

    /// Trading constraints for a symbol. Fetched fresh, never cached.
    async fn constraints(&self, symbol: &Symbol) -> Result<SymbolConstraints, TerminalError>;

    /// Current bid/ask for a symbol. Fetched fresh, never cached.
    async fn quote(&self, symbol: &Symbol) -> Result<Quote, TerminalError>;

    /// Full last tick for a symbol.
    async fn tick(&self, symbol: &Symbol) -> Result<Tick, TerminalError>;

    /// Daily low/high for a symbol, when the terminal has a session bar.
    async fn daily_range(&self, symbol: &Symbol) -> Result<Option<DailyRange>, TerminalError>;

    /// All open positions.
    async fn positions(&self) -> Result<Vec<PositionInfo>, TerminalError>;

    /// A single open position by ticket.
    async fn position(&self, ticket: u64) -> Result<Option<PositionInfo>, TerminalError>;

    /// All working pending orders.
    async fn pending_orders(&self) -> Result<Vec<PendingOrderInfo>, TerminalError>;

    /// Finished orders inside the window.
    async fn order_history(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<HistoricalOrder>, TerminalError>;

    /// Executed deals inside the window.
    async fn deal_history(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<HistoricalDeal>, TerminalError>;

    /// Submit an order request. Never retried.
    async fn submit(&self, request: &OrderRequest) -> Result<TradeAck, TerminalError>;
}
