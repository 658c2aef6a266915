//! Terminal-native order requests.
//!
//! An [`OrderRequest`] is the fully resolved structure handed to the
//! terminal: construct, submit, discard. It is only built after a positive
//! verdict, and optional protective levels stay omitted when the client
//! omitted them so adjacent flows never clobber broker-side stops.

use serde::{Deserialize, Serialize};

use super::market::{Quote, Symbol, SymbolConstraints};
use super::order::{ExecutionStyle, IntentError, OrderKind, Side, TradeIntent};

/// What the terminal should do with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Execute a deal immediately at the given price.
    ImmediateDeal,
    /// Park a pending (limit/stop) order.
    PendingOrder,
    /// Modify the protective levels of an open position.
    ModifyStops,
}

/// How unfilled volume is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillPolicy {
    /// Fill what is available now, cancel the remainder.
    ImmediateOrCancel,
    /// Keep the unfilled remainder working.
    ReturnOnPartial,
}

/// How long the order stays alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimePolicy {
    /// Good until explicitly cancelled.
    GoodTillCancel,
    /// Valid for the current trading day.
    Day,
}

/// Identification stamped on every outgoing request.
#[derive(Debug, Clone, Copy)]
pub struct RequestStamp {
    /// Expert id the terminal attributes the order to.
    pub magic: u64,
    /// Maximum accepted slippage for immediate deals, in ticks.
    pub deviation: u32,
}

impl Default for RequestStamp {
    fn default() -> Self {
        Self {
            magic: 1001,
            deviation: 20,
        }
    }
}

/// Why a request could not be built from otherwise admissible inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Market pricing needs a quote and none was available.
    #[error("no quote available to price a market order")]
    MissingQuote,
}

/// A fully resolved order request, ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Terminal action.
    pub action: ActionKind,
    /// Symbol the request applies to.
    pub symbol: Symbol,
    /// Volume in lots; absent for stop modifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Concrete order kind; absent for stop modifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<OrderKind>,
    /// Normalized price; absent for stop modifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Protective stop-loss; omitted when the client supplied none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    /// Take-profit; omitted when the client supplied none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    /// Fill policy; absent for stop modifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_policy: Option<FillPolicy>,
    /// Lifetime policy; absent for stop modifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_policy: Option<TimePolicy>,
    /// Maximum accepted slippage in ticks, immediate deals only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<u32>,
    /// Position ticket, for stop modifications and closes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    /// Expert id.
    pub magic: u64,
    /// Fixed identifying tag for traceability.
    pub tag: String,
}

/// The tag stamped on entry requests, per execution style.
#[must_use]
pub const fn style_tag(style: ExecutionStyle) -> &'static str {
    match style {
        ExecutionStyle::Market => "mesa:market",
        ExecutionStyle::Limit => "mesa:limit",
        ExecutionStyle::Stop => "mesa:stop",
    }
}

/// Tag stamped on position-close deals.
pub const CLOSE_TAG: &str = "mesa:close";

/// Build the request for a validated entry intent.
///
/// Market intents become immediate deals priced at the quote side matching
/// the intent side; limit/stop intents become pending orders at the
/// normalized requested price. Must only be called after a positive
/// verdict, and with inputs resolved in the same pass as that verdict.
///
/// # Errors
///
/// [`IntentError`] when the intent shape is invalid, [`BuildError`] when a
/// market order has no quote to price against.
pub fn build_entry_request(
    intent: &TradeIntent,
    constraints: &SymbolConstraints,
    quote: Option<&Quote>,
    stamp: &RequestStamp,
) -> Result<OrderRequest, EntryRequestError> {
    intent.check_shape().map_err(EntryRequestError::Intent)?;
    let kind = intent.kind();

    let (action, price, fill_policy, deviation) = match intent.style {
        ExecutionStyle::Market => {
            let quote = quote.ok_or(EntryRequestError::Build(BuildError::MissingQuote))?;
            let price = constraints.normalize(quote.side_price(intent.side));
            (
                ActionKind::ImmediateDeal,
                price,
                FillPolicy::ImmediateOrCancel,
                Some(stamp.deviation),
            )
        }
        ExecutionStyle::Limit | ExecutionStyle::Stop => {
            let raw = intent
                .price
                .ok_or(EntryRequestError::Intent(IntentError::MissingEntryPrice {
                    style: intent.style,
                }))?;
            (
                ActionKind::PendingOrder,
                constraints.normalize(raw),
                FillPolicy::ReturnOnPartial,
                None,
            )
        }
    };

    Ok(OrderRequest {
        action,
        symbol: intent.symbol.clone(),
        volume: Some(intent.quantity),
        kind: Some(kind),
        price: Some(price),
        stop_loss: intent.stop_loss,
        take_profit: intent.take_profit,
        fill_policy: Some(fill_policy),
        time_policy: Some(TimePolicy::GoodTillCancel),
        deviation,
        position: None,
        magic: stamp.magic,
        tag: style_tag(intent.style).to_string(),
    })
}

/// Errors from [`build_entry_request`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryRequestError {
    /// The intent shape was invalid.
    #[error(transparent)]
    Intent(#[from] IntentError),
    /// The request could not be priced.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl OrderRequest {
    /// Request modifying the protective levels of an open position.
    ///
    /// Callers merge omitted client fields with the broker-side values
    /// before building, so this never removes an existing level by
    /// accident.
    #[must_use]
    pub fn modify_stops(
        symbol: Symbol,
        ticket: u64,
        stop_loss: Option<f64>,
        take_profit: Option<f64>,
        magic: u64,
    ) -> Self {
        Self {
            action: ActionKind::ModifyStops,
            symbol,
            volume: None,
            kind: None,
            price: None,
            stop_loss,
            take_profit,
            fill_policy: None,
            time_policy: None,
            deviation: None,
            position: Some(ticket),
            magic,
            tag: "mesa:stops".to_string(),
        }
    }

    /// Request closing an open position with an opposite-side deal.
    #[must_use]
    pub fn close_position(
        symbol: Symbol,
        ticket: u64,
        position_side: Side,
        volume: f64,
        quote: &Quote,
        stamp: &RequestStamp,
    ) -> Self {
        let closing_side = position_side.opposite();
        // Closing a long hits the bid; closing a short lifts the ask.
        let price = quote.side_price(closing_side);
        Self {
            action: ActionKind::ImmediateDeal,
            symbol,
            volume: Some(volume),
            kind: Some(OrderKind::of(closing_side, ExecutionStyle::Market)),
            price: Some(price),
            stop_loss: None,
            take_profit: None,
            fill_policy: Some(FillPolicy::ImmediateOrCancel),
            time_policy: Some(TimePolicy::GoodTillCancel),
            deviation: Some(stamp.deviation),
            position: Some(ticket),
            magic: stamp.magic,
            tag: CLOSE_TAG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints() -> SymbolConstraints {
        SymbolConstraints {
            min_volume: Some(0.01),
            max_volume: Some(10.0),
            volume_step: Some(0.01),
            tick_size: Some(0.000_01),
            min_stop_distance_ticks: 100,
        }
    }

    fn quote() -> Quote {
        Quote {
            bid: 1.100_00,
            ask: 1.100_10,
        }
    }

    fn market_buy() -> TradeIntent {
        TradeIntent {
            symbol: Symbol::new("EURUSD"),
            side: Side::Buy,
            style: ExecutionStyle::Market,
            quantity: 0.5,
            price: None,
            stop_loss: Some(1.095_00),
            take_profit: Some(1.110_00),
        }
    }

    #[test]
    fn market_buy_becomes_immediate_deal_at_ask() {
        let request =
            build_entry_request(&market_buy(), &constraints(), Some(&quote()), &RequestStamp::default())
                .unwrap();

        assert_eq!(request.action, ActionKind::ImmediateDeal);
        assert_eq!(request.kind, Some(OrderKind::BuyMarket));
        assert!((request.price.unwrap() - 1.100_10).abs() < 1e-9);
        assert_eq!(request.fill_policy, Some(FillPolicy::ImmediateOrCancel));
        assert_eq!(request.time_policy, Some(TimePolicy::GoodTillCancel));
        assert_eq!(request.deviation, Some(20));
        assert_eq!(request.magic, 1001);
        assert_eq!(request.tag, "mesa:market");
        assert_eq!(request.stop_loss, Some(1.095_00));
        assert_eq!(request.take_profit, Some(1.110_00));
        assert_eq!(request.position, None);
    }

    #[test]
    fn sell_market_prices_at_bid() {
        let mut intent = market_buy();
        intent.side = Side::Sell;
        intent.stop_loss = None;
        intent.take_profit = None;

        let request =
            build_entry_request(&intent, &constraints(), Some(&quote()), &RequestStamp::default())
                .unwrap();
        assert!((request.price.unwrap() - 1.100_00).abs() < 1e-9);
        assert_eq!(request.kind, Some(OrderKind::SellMarket));
    }

    #[test]
    fn pending_order_uses_normalized_requested_price() {
        let mut intent = market_buy();
        intent.style = ExecutionStyle::Limit;
        intent.price = Some(1.095_004); // off-grid, rounds to 1.09500
        intent.stop_loss = None;
        intent.take_profit = None;

        let request =
            build_entry_request(&intent, &constraints(), Some(&quote()), &RequestStamp::default())
                .unwrap();

        assert_eq!(request.action, ActionKind::PendingOrder);
        assert_eq!(request.kind, Some(OrderKind::BuyLimit));
        assert!((request.price.unwrap() - 1.095_00).abs() < 1e-9);
        // Pending orders keep the unfilled remainder working.
        assert_eq!(request.fill_policy, Some(FillPolicy::ReturnOnPartial));
        assert_eq!(request.deviation, None);
        assert_eq!(request.tag, "mesa:limit");
    }

    #[test]
    fn pending_orders_build_without_a_quote() {
        let mut intent = market_buy();
        intent.style = ExecutionStyle::Stop;
        intent.price = Some(1.105_00);
        intent.stop_loss = None;
        intent.take_profit = None;

        let request =
            build_entry_request(&intent, &constraints(), None, &RequestStamp::default()).unwrap();
        assert_eq!(request.tag, "mesa:stop");
    }

    #[test]
    fn market_order_without_quote_fails_to_build() {
        let result =
            build_entry_request(&market_buy(), &constraints(), None, &RequestStamp::default());
        assert_eq!(
            result,
            Err(EntryRequestError::Build(BuildError::MissingQuote))
        );
    }

    #[test]
    fn omitted_levels_stay_omitted_in_json() {
        let mut intent = market_buy();
        intent.stop_loss = None;
        intent.take_profit = None;

        let request =
            build_entry_request(&intent, &constraints(), Some(&quote()), &RequestStamp::default())
                .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("stop_loss").is_none());
        assert!(json.get("take_profit").is_none());
    }

    #[test]
    fn modify_stops_request_targets_the_ticket() {
        let request = OrderRequest::modify_stops(
            Symbol::new("EURUSD"),
            42,
            Some(1.095),
            None,
            1001,
        );
        assert_eq!(request.action, ActionKind::ModifyStops);
        assert_eq!(request.position, Some(42));
        assert_eq!(request.volume, None);
        assert_eq!(request.kind, None);
        assert_eq!(request.stop_loss, Some(1.095));
        assert_eq!(request.take_profit, None);
    }

    #[test]
    fn closing_a_long_sells_at_the_bid() {
        let request = OrderRequest::close_position(
            Symbol::new("EURUSD"),
            42,
            Side::Buy,
            0.5,
            &quote(),
            &RequestStamp::default(),
        );
        assert_eq!(request.action, ActionKind::ImmediateDeal);
        assert_eq!(request.kind, Some(OrderKind::SellMarket));
        assert!((request.price.unwrap() - 1.100_00).abs() < 1e-9);
        assert_eq!(request.position, Some(42));
        assert_eq!(request.tag, CLOSE_TAG);
    }

    #[test]
    fn closing_a_short_buys_at_the_ask() {
        let request = OrderRequest::close_position(
            Symbol::new("EURUSD"),
            7,
            Side::Sell,
            0.1,
            &quote(),
            &RequestStamp::default(),
        );
        assert_eq!(request.kind, Some(OrderKind::BuyMarket));
        assert!((request.price.unwrap() - 1.100_10).abs() < 1e-9);
    }
}
