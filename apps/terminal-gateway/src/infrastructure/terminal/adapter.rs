//! Terminal bridge adapter implementing [`TerminalPort`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::ports::{
    DailyRange, HistoricalDeal, HistoricalOrder, PendingOrderInfo, PositionInfo, TerminalError,
    TerminalPort, TerminalStatus, Tick, TradeAck,
};
use crate::domain::market::{Quote, Symbol, SymbolConstraints};
use crate::domain::request::OrderRequest;

use super::api_types::{
    BridgeAccountInfo, BridgeDeal, BridgeHistoryOrder, BridgeOrder, BridgePosition, BridgeRate,
    BridgeSymbolInfo, BridgeTerminalInfo, BridgeTick, BridgeTradeRequest, BridgeTradeResult,
};
use super::config::BridgeConfig;
use super::error::BridgeError;
use super::http_client::BridgeHttpClient;

/// Adapter for a terminal bridge REST API.
///
/// The bridge sits next to the terminal and exposes its native calls over
/// HTTP; this adapter owns the mapping between the gateway's domain types
/// and the bridge's wire format.
#[derive(Debug, Clone)]
pub struct TerminalBridgeAdapter {
    client: BridgeHttpClient,
}

impl TerminalBridgeAdapter {
    /// Create a new adapter from config.
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        Ok(Self {
            client: BridgeHttpClient::new(config)?,
        })
    }

    fn symbol_error(symbol: &Symbol, err: BridgeError) -> TerminalError {
        match err {
            BridgeError::NotFound { .. } => TerminalError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            other => other.into(),
        }
    }
}

#[async_trait]
impl TerminalPort for TerminalBridgeAdapter {
    async fn status(&self) -> Result<TerminalStatus, TerminalError> {
        let terminal: BridgeTerminalInfo = self
            .client
            .get("/v1/terminal")
            .await
            .map_err(TerminalError::from)?;

        // A terminal without a logged-in account still has a status.
        let account = match self.client.get::<BridgeAccountInfo>("/v1/account").await {
            Ok(info) => Some(info.to_summary()),
            Err(BridgeError::NotFound { .. }) => None,
            Err(e) => {
                tracing::debug!(error = %e, "account info unavailable");
                None
            }
        };

        Ok(TerminalStatus {
            connected: terminal.connected,
            trade_allowed: terminal.trade_allowed,
            server: terminal.server,
            ping_ms: terminal.ping_last,
            account,
        })
    }

    async fn ensure_symbol(&self, symbol: &Symbol) -> Result<(), TerminalError> {
        let info: BridgeSymbolInfo = self
            .client
            .get(&format!("/v1/symbols/{symbol}"))
            .await
            .map_err(|e| Self::symbol_error(symbol, e))?;

        if !info.visible {
            tracing::info!(%symbol, "activating symbol in market watch");
            let _: serde_json::Value = self
                .client
                .post(
                    &format!("/v1/symbols/{symbol}/select"),
                    &serde_json::json!({ "visible": true }),
                )
                .await
                .map_err(|e| Self::symbol_error(symbol, e))?;
        }
        Ok(())
    }

    async fn constraints(&self, symbol: &Symbol) -> Result<SymbolConstraints, TerminalError> {
        let info: BridgeSymbolInfo = self
            .client
            .get(&format!("/v1/symbols/{symbol}"))
            .await
            .map_err(|e| Self::symbol_error(symbol, e))?;
        Ok(info.to_constraints())
    }

    async fn quote(&self, symbol: &Symbol) -> Result<Quote, TerminalError> {
        Ok(self.tick(symbol).await?.quote())
    }

    async fn tick(&self, symbol: &Symbol) -> Result<Tick, TerminalError> {
        let tick: BridgeTick = self
            .client
            .get(&format!("/v1/symbols/{symbol}/tick"))
            .await
            .map_err(|e| match e {
                BridgeError::NotFound { .. } => TerminalError::Unavailable {
                    message: format!("no tick for {symbol}"),
                },
                other => other.into(),
            })?;
        Ok(tick.to_tick())
    }

    async fn daily_range(&self, symbol: &Symbol) -> Result<Option<DailyRange>, TerminalError> {
        let rates: Vec<BridgeRate> = match self
            .client
            .get(&format!("/v1/symbols/{symbol}/rates?timeframe=D1&count=1"))
            .await
        {
            Ok(rates) => rates,
            Err(BridgeError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(rates.first().map(BridgeRate::to_daily_range))
    }

    async fn positions(&self) -> Result<Vec<PositionInfo>, TerminalError> {
        let positions: Vec<BridgePosition> = self
            .client
            .get("/v1/positions")
            .await
            .map_err(TerminalError::from)?;
        Ok(positions.iter().map(BridgePosition::to_position).collect())
    }

    async fn position(&self, ticket: u64) -> Result<Option<PositionInfo>, TerminalError> {
        match self
            .client
            .get::<BridgePosition>(&format!("/v1/positions/{ticket}"))
            .await
        {
            Ok(position) => Ok(Some(position.to_position())),
            Err(BridgeError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn pending_orders(&self) -> Result<Vec<PendingOrderInfo>, TerminalError> {
        let orders: Vec<BridgeOrder> = self
            .client
            .get("/v1/orders")
            .await
            .map_err(TerminalError::from)?;
        Ok(orders
            .iter()
            .filter_map(BridgeOrder::to_pending_order)
            .collect())
    }

    async fn order_history(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<HistoricalOrder>, TerminalError> {
        let orders: Vec<BridgeHistoryOrder> = self
            .client
            .get(&format!(
                "/v1/history/orders?from={}&to={}",
                from.timestamp(),
                to.timestamp()
            ))
            .await
            .map_err(TerminalError::from)?;
        Ok(orders
            .iter()
            .filter_map(BridgeHistoryOrder::to_historical_order)
            .collect())
    }

    async fn deal_history(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<HistoricalDeal>, TerminalError> {
        let deals: Vec<BridgeDeal> = self
            .client
            .get(&format!(
                "/v1/history/deals?from={}&to={}",
                from.timestamp(),
                to.timestamp()
            ))
            .await
            .map_err(TerminalError::from)?;
        Ok(deals.iter().map(BridgeDeal::to_historical_deal).collect())
    }

    async fn submit(&self, request: &OrderRequest) -> Result<TradeAck, TerminalError> {
        let wire = BridgeTradeRequest::from(request);
        tracing::info!(
            symbol = %request.symbol,
            action = wire.action,
            order_type = ?wire.order_type,
            volume = ?wire.volume,
            price = ?wire.price,
            comment = %wire.comment,
            "sending trade request to terminal"
        );

        let result: BridgeTradeResult = self
            .client
            .post("/v1/order", &wire)
            .await
            .map_err(TerminalError::from)?;
        Ok(result.to_ack())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::Symbol;
    use crate::domain::order::{ExecutionStyle, Side, TradeIntent};
    use crate::domain::request::{RequestStamp, build_entry_request};
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn symbol_info_body() -> serde_json::Value {
        serde_json::json!({
            "visible": true,
            "volume_min": 0.01,
            "volume_max": 10.0,
            "volume_step": 0.01,
            "trade_tick_size": 0.00001,
            "trade_stops_level": 100
        })
    }

    async fn adapter_for(server: &MockServer) -> TerminalBridgeAdapter {
        let config = BridgeConfig::new(server.uri())
            .with_timeout(Duration::from_secs(2))
            .with_retry(super::super::config::RetryConfig {
                max_attempts: 1,
                ..Default::default()
            });
        TerminalBridgeAdapter::new(&config).unwrap()
    }

    #[tokio::test]
    async fn constraints_come_from_symbol_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/symbols/EURUSD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(symbol_info_body()))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let constraints = adapter.constraints(&Symbol::new("EURUSD")).await.unwrap();
        assert_eq!(constraints.min_volume, Some(0.01));
        assert_eq!(constraints.min_stop_distance_ticks, 100);
    }

    #[tokio::test]
    async fn unknown_symbol_maps_to_symbol_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/symbols/NOPE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let result = adapter.constraints(&Symbol::new("NOPE")).await;
        assert!(matches!(
            result,
            Err(TerminalError::SymbolNotFound { symbol }) if symbol == "NOPE"
        ));
    }

    #[tokio::test]
    async fn ensure_symbol_activates_invisible_symbols() {
        let server = MockServer::start().await;
        let mut info = symbol_info_body();
        info["visible"] = serde_json::json!(false);

        Mock::given(method("GET"))
            .and(path("/v1/symbols/EURUSD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(info))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/symbols/EURUSD/select"))
            .and(body_partial_json(serde_json::json!({ "visible": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        adapter.ensure_symbol(&Symbol::new("EURUSD")).await.unwrap();
    }

    #[tokio::test]
    async fn missing_tick_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/symbols/EURUSD/tick"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        assert!(matches!(
            adapter.quote(&Symbol::new("EURUSD")).await,
            Err(TerminalError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_position_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/positions/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        assert!(adapter.position(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn submit_sends_terminal_wire_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/order"))
            .and(body_partial_json(serde_json::json!({
                "action": 1,
                "symbol": "EURUSD",
                "type": 0,
                "volume": 0.5,
                "type_filling": 1,
                "type_time": 0,
                "deviation": 20,
                "magic": 1001,
                "comment": "mesa:market"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "retcode": 10009,
                "deal": 11,
                "order": 12,
                "volume": 0.5,
                "price": 1.1001,
                "bid": 1.1,
                "ask": 1.1001,
                "comment": "done",
                "request_id": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let intent = TradeIntent {
            symbol: Symbol::new("EURUSD"),
            side: Side::Buy,
            style: ExecutionStyle::Market,
            quantity: 0.5,
            price: None,
            stop_loss: None,
            take_profit: None,
        };
        let constraints = SymbolConstraints {
            min_volume: Some(0.01),
            max_volume: Some(10.0),
            volume_step: Some(0.01),
            tick_size: Some(0.000_01),
            min_stop_distance_ticks: 100,
        };
        let quote = Quote {
            bid: 1.1,
            ask: 1.1001,
        };
        let request =
            build_entry_request(&intent, &constraints, Some(&quote), &RequestStamp::default())
                .unwrap();

        let adapter = adapter_for(&server).await;
        let ack = adapter.submit(&request).await.unwrap();
        assert_eq!(ack.retcode, 10009);
        assert_eq!(ack.order, 12);
    }

    #[tokio::test]
    async fn history_queries_use_unix_bounds() {
        let server = MockServer::start().await;
        let from = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let to = DateTime::from_timestamp(1_700_086_400, 0).unwrap();

        Mock::given(method("GET"))
            .and(path("/v1/history/deals"))
            .and(query_param("from", "1700000000"))
            .and(query_param("to", "1700086400"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "ticket": 1,
                "order": 2,
                "symbol": "EURUSD",
                "type": 1,
                "volume": 0.5,
                "price": 1.1,
                "profit": 4.2,
                "time": 1700000500
            }])))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let deals = adapter.deal_history(from, to).await.unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].side, Side::Sell);
        assert_eq!(deals[0].profit, 4.2);
    }
}
