//! Bridge API request and response types.
//!
//! These map the bridge's REST payloads, which mirror the terminal's native
//! trade-request structure: numeric action/type/filling/time codes, `sl`/`tp`
//! level fields, an expert `magic` id and a free-form `comment`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    AccountSummary, DailyRange, HistoricalDeal, HistoricalOrder, PendingOrderInfo, PositionInfo,
    Tick, TradeAck,
};
use crate::domain::market::SymbolConstraints;
use crate::domain::order::{OrderKind, Side};
use crate::domain::request::{ActionKind, FillPolicy, OrderRequest, TimePolicy};

// ============================================================================
// Terminal wire codes
// ============================================================================

/// Immediate deal action code.
pub const ACTION_DEAL: u8 = 1;
/// Pending order action code.
pub const ACTION_PENDING: u8 = 5;
/// Stop-modification action code.
pub const ACTION_SLTP: u8 = 6;

/// Fill-or-kill filling code.
pub const FILLING_FOK: u8 = 0;
/// Immediate-or-cancel filling code.
pub const FILLING_IOC: u8 = 1;
/// Keep-remainder filling code.
pub const FILLING_RETURN: u8 = 2;

/// Good-till-cancel lifetime code.
pub const TIME_GTC: u8 = 0;
/// Current-day lifetime code.
pub const TIME_DAY: u8 = 1;

const ORDER_TYPE_BUY: u8 = 0;
const ORDER_TYPE_SELL: u8 = 1;
const ORDER_TYPE_BUY_LIMIT: u8 = 2;
const ORDER_TYPE_SELL_LIMIT: u8 = 3;
const ORDER_TYPE_BUY_STOP: u8 = 4;
const ORDER_TYPE_SELL_STOP: u8 = 5;

/// Terminal order-type code for a kind.
#[must_use]
pub const fn order_type_code(kind: OrderKind) -> u8 {
    match kind {
        OrderKind::BuyMarket => ORDER_TYPE_BUY,
        OrderKind::SellMarket => ORDER_TYPE_SELL,
        OrderKind::BuyLimit => ORDER_TYPE_BUY_LIMIT,
        OrderKind::SellLimit => ORDER_TYPE_SELL_LIMIT,
        OrderKind::BuyStop => ORDER_TYPE_BUY_STOP,
        OrderKind::SellStop => ORDER_TYPE_SELL_STOP,
    }
}

/// Kind for a terminal order-type code, `None` for codes the gateway does
/// not handle (close-by, etc.).
#[must_use]
pub const fn order_kind_from_code(code: u8) -> Option<OrderKind> {
    match code {
        ORDER_TYPE_BUY => Some(OrderKind::BuyMarket),
        ORDER_TYPE_SELL => Some(OrderKind::SellMarket),
        ORDER_TYPE_BUY_LIMIT => Some(OrderKind::BuyLimit),
        ORDER_TYPE_SELL_LIMIT => Some(OrderKind::SellLimit),
        ORDER_TYPE_BUY_STOP => Some(OrderKind::BuyStop),
        ORDER_TYPE_SELL_STOP => Some(OrderKind::SellStop),
        _ => None,
    }
}

const fn side_from_code(code: u8) -> Side {
    if code == ORDER_TYPE_SELL {
        Side::Sell
    } else {
        Side::Buy
    }
}

/// Zero price levels mean "not set" on the terminal side.
fn level(value: f64) -> Option<f64> {
    if value == 0.0 { None } else { Some(value) }
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

// ============================================================================
// Trade request / result
// ============================================================================

/// Trade request in the bridge's wire format.
#[derive(Debug, Clone, Serialize)]
pub struct BridgeTradeRequest {
    /// Action code.
    pub action: u8,
    /// Symbol.
    pub symbol: String,
    /// Volume in lots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Order-type code.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<u8>,
    /// Price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Stop-loss level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl: Option<f64>,
    /// Take-profit level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp: Option<f64>,
    /// Maximum slippage in ticks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<u32>,
    /// Lifetime code.
    #[serde(rename = "type_time", skip_serializing_if = "Option::is_none")]
    pub time_code: Option<u8>,
    /// Filling code.
    #[serde(rename = "type_filling", skip_serializing_if = "Option::is_none")]
    pub filling_code: Option<u8>,
    /// Position ticket, for stop modifications and closes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    /// Expert id.
    pub magic: u64,
    /// Identifying comment.
    pub comment: String,
}

impl From<&OrderRequest> for BridgeTradeRequest {
    fn from(request: &OrderRequest) -> Self {
        let action = match request.action {
            ActionKind::ImmediateDeal => ACTION_DEAL,
            ActionKind::PendingOrder => ACTION_PENDING,
            ActionKind::ModifyStops => ACTION_SLTP,
        };
        let filling_code = request.fill_policy.map(|policy| match policy {
            FillPolicy::ImmediateOrCancel => FILLING_IOC,
            FillPolicy::ReturnOnPartial => FILLING_RETURN,
        });
        let time_code = request.time_policy.map(|policy| match policy {
            TimePolicy::GoodTillCancel => TIME_GTC,
            TimePolicy::Day => TIME_DAY,
        });

        Self {
            action,
            symbol: request.symbol.as_str().to_string(),
            volume: request.volume,
            order_type: request.kind.map(order_type_code),
            price: request.price,
            sl: request.stop_loss,
            tp: request.take_profit,
            deviation: request.deviation,
            time_code,
            filling_code,
            position: request.position,
            magic: request.magic,
            comment: request.tag.clone(),
        }
    }
}

/// Result of a trade request, in the bridge's wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeTradeResult {
    /// Terminal return code.
    pub retcode: u32,
    /// Deal ticket.
    #[serde(default)]
    pub deal: u64,
    /// Order ticket.
    #[serde(default)]
    pub order: u64,
    /// Executed volume.
    #[serde(default)]
    pub volume: f64,
    /// Execution price.
    #[serde(default)]
    pub price: f64,
    /// Bid at execution.
    #[serde(default)]
    pub bid: f64,
    /// Ask at execution.
    #[serde(default)]
    pub ask: f64,
    /// Terminal comment.
    #[serde(default)]
    pub comment: String,
    /// Terminal request id.
    #[serde(default)]
    pub request_id: u64,
}

impl BridgeTradeResult {
    /// Convert to the port's acknowledgement type.
    #[must_use]
    pub fn to_ack(&self) -> TradeAck {
        TradeAck {
            retcode: self.retcode,
            deal: self.deal,
            order: self.order,
            volume: self.volume,
            price: self.price,
            bid: self.bid,
            ask: self.ask,
            comment: self.comment.clone(),
            request_id: self.request_id,
        }
    }
}

// ============================================================================
// Symbol / quote types
// ============================================================================

/// Symbol metadata as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeSymbolInfo {
    /// Whether the symbol is visible in the terminal's market watch.
    #[serde(default)]
    pub visible: bool,
    /// Minimum volume.
    #[serde(default)]
    pub volume_min: Option<f64>,
    /// Maximum volume.
    #[serde(default)]
    pub volume_max: Option<f64>,
    /// Volume step.
    #[serde(default)]
    pub volume_step: Option<f64>,
    /// Tick size.
    #[serde(default)]
    pub trade_tick_size: Option<f64>,
    /// Minimum stop distance in ticks.
    #[serde(default)]
    pub trade_stops_level: Option<u32>,
}

impl BridgeSymbolInfo {
    /// Project onto the domain constraints snapshot.
    #[must_use]
    pub fn to_constraints(&self) -> SymbolConstraints {
        SymbolConstraints {
            min_volume: self.volume_min,
            max_volume: self.volume_max,
            volume_step: self.volume_step,
            tick_size: self.trade_tick_size,
            min_stop_distance_ticks: self.trade_stops_level.unwrap_or(0),
        }
    }
}

/// Last tick as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeTick {
    /// Best bid.
    pub bid: f64,
    /// Best ask.
    pub ask: f64,
    /// Last traded price.
    #[serde(default)]
    pub last: f64,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub time: i64,
}

impl BridgeTick {
    /// Convert to the port tick type.
    #[must_use]
    pub fn to_tick(&self) -> Tick {
        Tick {
            bid: self.bid,
            ask: self.ask,
            last: self.last,
            time: timestamp(self.time),
        }
    }
}

/// One OHLC bar as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeRate {
    /// Bar open time, unix seconds.
    #[serde(default)]
    pub time: i64,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
}

impl BridgeRate {
    /// Project onto a daily range.
    #[must_use]
    pub const fn to_daily_range(&self) -> DailyRange {
        DailyRange {
            low: self.low,
            high: self.high,
        }
    }
}

// ============================================================================
// Terminal / account types
// ============================================================================

/// Terminal connectivity info.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeTerminalInfo {
    /// Connected to the trade server.
    #[serde(default)]
    pub connected: bool,
    /// Trading allowed.
    #[serde(default)]
    pub trade_allowed: bool,
    /// Trade server name.
    #[serde(default)]
    pub server: Option<String>,
    /// Last ping in milliseconds.
    #[serde(default)]
    pub ping_last: Option<u32>,
}

/// Logged-in account info.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeAccountInfo {
    /// Login number.
    pub login: u64,
    /// Holder name.
    #[serde(default)]
    pub name: String,
    /// Balance.
    #[serde(default)]
    pub balance: f64,
    /// Equity.
    #[serde(default)]
    pub equity: f64,
    /// Currency code.
    #[serde(default)]
    pub currency: String,
}

impl BridgeAccountInfo {
    /// Project onto the port account summary.
    #[must_use]
    pub fn to_summary(&self) -> AccountSummary {
        AccountSummary {
            login: self.login,
            name: self.name.clone(),
            balance: self.balance,
            equity: self.equity,
            currency: self.currency.clone(),
        }
    }
}

// ============================================================================
// Positions / orders / history
// ============================================================================

/// An open position as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgePosition {
    /// Position ticket.
    pub ticket: u64,
    /// Symbol.
    pub symbol: String,
    /// Position type code (0 buy, 1 sell).
    #[serde(rename = "type")]
    pub position_type: u8,
    /// Volume in lots.
    pub volume: f64,
    /// Open price.
    pub price_open: f64,
    /// Stop-loss level, zero when unset.
    #[serde(default)]
    pub sl: f64,
    /// Take-profit level, zero when unset.
    #[serde(default)]
    pub tp: f64,
    /// Floating profit.
    #[serde(default)]
    pub profit: f64,
}

impl BridgePosition {
    /// Project onto the port position type.
    #[must_use]
    pub fn to_position(&self) -> PositionInfo {
        PositionInfo {
            ticket: self.ticket,
            symbol: self.symbol.clone(),
            side: side_from_code(self.position_type),
            volume: self.volume,
            open_price: self.price_open,
            stop_loss: level(self.sl),
            take_profit: level(self.tp),
            profit: self.profit,
        }
    }
}

/// A working pending order as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeOrder {
    /// Order ticket.
    pub ticket: u64,
    /// Symbol.
    pub symbol: String,
    /// Order-type code.
    #[serde(rename = "type")]
    pub order_type: u8,
    /// Remaining volume.
    pub volume_current: f64,
    /// Resting price.
    pub price_open: f64,
    /// Stop-loss level, zero when unset.
    #[serde(default)]
    pub sl: f64,
    /// Take-profit level, zero when unset.
    #[serde(default)]
    pub tp: f64,
    /// Placement time, unix seconds.
    #[serde(default)]
    pub time_setup: i64,
}

impl BridgeOrder {
    /// Project onto the port pending-order type; `None` for order types the
    /// gateway does not model.
    #[must_use]
    pub fn to_pending_order(&self) -> Option<PendingOrderInfo> {
        Some(PendingOrderInfo {
            ticket: self.ticket,
            symbol: self.symbol.clone(),
            kind: order_kind_from_code(self.order_type)?,
            volume: self.volume_current,
            price: self.price_open,
            stop_loss: level(self.sl),
            take_profit: level(self.tp),
            placed_at: timestamp(self.time_setup),
        })
    }
}

/// A finished order as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeHistoryOrder {
    /// Order ticket.
    pub ticket: u64,
    /// Symbol.
    pub symbol: String,
    /// Order-type code.
    #[serde(rename = "type")]
    pub order_type: u8,
    /// Initial volume.
    pub volume_initial: f64,
    /// Order price.
    pub price_open: f64,
    /// Final state name.
    #[serde(default)]
    pub state: String,
    /// Completion time, unix seconds.
    #[serde(default)]
    pub time_done: i64,
}

impl BridgeHistoryOrder {
    /// Project onto the port historical-order type.
    #[must_use]
    pub fn to_historical_order(&self) -> Option<HistoricalOrder> {
        Some(HistoricalOrder {
            ticket: self.ticket,
            symbol: self.symbol.clone(),
            kind: order_kind_from_code(self.order_type)?,
            volume: self.volume_initial,
            price: self.price_open,
            state: self.state.clone(),
            done_at: timestamp(self.time_done),
        })
    }
}

/// An executed deal as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeDeal {
    /// Deal ticket.
    pub ticket: u64,
    /// Originating order ticket.
    #[serde(default)]
    pub order: u64,
    /// Symbol.
    pub symbol: String,
    /// Deal type code (0 buy, 1 sell).
    #[serde(rename = "type")]
    pub deal_type: u8,
    /// Executed volume.
    pub volume: f64,
    /// Execution price.
    pub price: f64,
    /// Realized profit.
    #[serde(default)]
    pub profit: f64,
    /// Execution time, unix seconds.
    #[serde(default)]
    pub time: i64,
}

impl BridgeDeal {
    /// Project onto the port historical-deal type.
    #[must_use]
    pub fn to_historical_deal(&self) -> HistoricalDeal {
        HistoricalDeal {
            ticket: self.ticket,
            order: self.order,
            symbol: self.symbol.clone(),
            side: side_from_code(self.deal_type),
            volume: self.volume,
            price: self.price,
            profit: self.profit,
            time: timestamp(self.time),
        }
    }
}

/// Error payload from the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeErrorResponse {
    /// Error code, when the bridge supplies one.
    #[serde(default)]
    pub code: Option<String>,
    /// Error message.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::Symbol;
    use crate::domain::request::RequestStamp;

    #[test]
    fn order_type_codes_roundtrip() {
        for kind in [
            OrderKind::BuyMarket,
            OrderKind::SellMarket,
            OrderKind::BuyLimit,
            OrderKind::SellLimit,
            OrderKind::BuyStop,
            OrderKind::SellStop,
        ] {
            assert_eq!(order_kind_from_code(order_type_code(kind)), Some(kind));
        }
        assert_eq!(order_kind_from_code(8), None);
    }

    #[test]
    fn zero_levels_become_none() {
        let position = BridgePosition {
            ticket: 1,
            symbol: "EURUSD".to_string(),
            position_type: 0,
            volume: 0.5,
            price_open: 1.1,
            sl: 0.0,
            tp: 1.2,
            profit: 0.0,
        };
        let info = position.to_position();
        assert_eq!(info.stop_loss, None);
        assert_eq!(info.take_profit, Some(1.2));
        assert_eq!(info.side, Side::Buy);
    }

    #[test]
    fn trade_request_wire_format() {
        let request = OrderRequest::modify_stops(
            Symbol::new("EURUSD"),
            42,
            Some(1.09),
            None,
            1001,
        );
        let wire = BridgeTradeRequest::from(&request);
        assert_eq!(wire.action, ACTION_SLTP);
        assert_eq!(wire.position, Some(42));
        assert_eq!(wire.sl, Some(1.09));
        assert_eq!(wire.tp, None);

        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("tp").is_none(), "omitted levels must not serialize");
        assert!(json.get("volume").is_none());
        assert_eq!(json["action"], 6);
    }

    #[test]
    fn close_request_wire_format() {
        let request = OrderRequest::close_position(
            Symbol::new("EURUSD"),
            42,
            Side::Buy,
            0.5,
            &crate::domain::market::Quote {
                bid: 1.1,
                ask: 1.1001,
            },
            &RequestStamp::default(),
        );
        let wire = BridgeTradeRequest::from(&request);
        assert_eq!(wire.action, ACTION_DEAL);
        assert_eq!(wire.order_type, Some(1)); // sell closes a long
        assert_eq!(wire.filling_code, Some(FILLING_IOC));
        assert_eq!(wire.time_code, Some(TIME_GTC));
        assert_eq!(wire.deviation, Some(20));
        assert_eq!(wire.magic, 1001);
    }

    #[test]
    fn symbol_info_projects_to_constraints() {
        let info = BridgeSymbolInfo {
            visible: true,
            volume_min: Some(0.01),
            volume_max: Some(10.0),
            volume_step: Some(0.01),
            trade_tick_size: Some(0.000_01),
            trade_stops_level: Some(100),
        };
        let constraints = info.to_constraints();
        assert_eq!(constraints.min_stop_distance_ticks, 100);
        assert_eq!(constraints.tick_size, Some(0.000_01));
    }

    #[test]
    fn unknown_pending_order_types_are_skipped() {
        let order = BridgeOrder {
            ticket: 1,
            symbol: "EURUSD".to_string(),
            order_type: 8, // close-by, not modeled
            volume_current: 0.1,
            price_open: 1.1,
            sl: 0.0,
            tp: 0.0,
            time_setup: 0,
        };
        assert!(order.to_pending_order().is_none());
    }
}
