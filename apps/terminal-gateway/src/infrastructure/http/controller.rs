//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the application use cases. The
//! routes keep the upstream service's Portuguese paths so existing clients
//! keep working.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;

use crate::application::ports::{TerminalError, TerminalPort};
use crate::application::use_cases::{
    AdjustStopsUseCase, ClosePositionUseCase, GatewayError, PlaceOrderUseCase, PlacementOutcome,
    StopAdjustment, ValidateOrderUseCase,
};
use crate::domain::market::Symbol;
use crate::domain::request::BuildError;

use super::request::{AdjustStopForm, HistoryWindow, OrderForm};
use super::response::{
    DealHistoryResponse, ErrorResponse, HealthResponse, OrderHistoryResponse,
    PendingOrdersResponse, PositionsResponse, QuoteResponse, VerdictResponse,
};

/// Application state shared across handlers.
pub struct AppState<T: TerminalPort> {
    /// Terminal port, used directly by read-through endpoints.
    pub terminal: Arc<T>,
    /// Dry-run validation use case.
    pub validate_order: Arc<ValidateOrderUseCase<T>>,
    /// Submission use case.
    pub place_order: Arc<PlaceOrderUseCase<T>>,
    /// Stop-adjustment use case.
    pub adjust_stops: Arc<AdjustStopsUseCase<T>>,
    /// Close-position use case.
    pub close_position: Arc<ClosePositionUseCase<T>>,
    /// Application version.
    pub version: String,
}

impl<T: TerminalPort> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            terminal: Arc::clone(&self.terminal),
            validate_order: Arc::clone(&self.validate_order),
            place_order: Arc::clone(&self.place_order),
            adjust_stops: Arc::clone(&self.adjust_stops),
            close_position: Arc::clone(&self.close_position),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<T: TerminalPort + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(terminal_status))
        .route("/cotacao/{symbol}", get(quote))
        .route("/posicoes", get(positions))
        .route("/ordens-pendentes", get(pending_orders))
        .route("/historico/ordens", get(order_history))
        .route("/historico/negocios", get(deal_history))
        .route("/validar-ordem", get(validate_order))
        .route("/ordem", post(place_order))
        .route("/ajustar-stop", post(adjust_stops))
        .route("/fechar/{ticket}", post(close_position))
        .with_state(state)
}

/// Health check endpoint.
async fn health<T: TerminalPort>(State(state): State<AppState<T>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Terminal and account status.
async fn terminal_status<T: TerminalPort>(
    State(state): State<AppState<T>>,
) -> Result<Response, ApiError> {
    let status = state.terminal.status().await?;
    Ok(Json(status).into_response())
}

/// Last tick and daily range for a symbol.
async fn quote<T: TerminalPort>(
    State(state): State<AppState<T>>,
    Path(symbol): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let symbol = Symbol::new(symbol);
    state.terminal.ensure_symbol(&symbol).await?;
    let tick = state.terminal.tick(&symbol).await?;
    let range = state.terminal.daily_range(&symbol).await?;

    Ok(Json(QuoteResponse {
        symbol: symbol.to_string(),
        bid: tick.bid,
        ask: tick.ask,
        last: tick.last,
        daily_low: range.map(|r| r.low),
        daily_high: range.map(|r| r.high),
        time: tick.time,
    }))
}

/// Open positions.
async fn positions<T: TerminalPort>(
    State(state): State<AppState<T>>,
) -> Result<Json<PositionsResponse>, ApiError> {
    let positions = state.terminal.positions().await?;
    Ok(Json(PositionsResponse { positions }))
}

/// Working pending orders.
async fn pending_orders<T: TerminalPort>(
    State(state): State<AppState<T>>,
) -> Result<Json<PendingOrdersResponse>, ApiError> {
    let orders = state.terminal.pending_orders().await?;
    Ok(Json(PendingOrdersResponse { orders }))
}

/// Finished orders inside a date window.
async fn order_history<T: TerminalPort>(
    State(state): State<AppState<T>>,
    Query(window): Query<HistoryWindow>,
) -> Result<Json<OrderHistoryResponse>, ApiError> {
    let (from, to) = window.resolve(Utc::now());
    let orders = state.terminal.order_history(from, to).await?;
    Ok(Json(OrderHistoryResponse { orders }))
}

/// Executed deals inside a date window.
async fn deal_history<T: TerminalPort>(
    State(state): State<AppState<T>>,
    Query(window): Query<HistoryWindow>,
) -> Result<Json<DealHistoryResponse>, ApiError> {
    let (from, to) = window.resolve(Utc::now());
    let deals = state.terminal.deal_history(from, to).await?;
    Ok(Json(DealHistoryResponse { deals }))
}

/// Dry-run validation: the verdict comes back as JSON, 400 when rejected,
/// and nothing is submitted.
async fn validate_order<T: TerminalPort>(
    State(state): State<AppState<T>>,
    Query(form): Query<OrderForm>,
) -> Result<Response, ApiError> {
    let intent = form.into_intent();
    let verdict = state.validate_order.execute(&intent).await?;
    let status = if verdict.admissible {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(VerdictResponse::from(&verdict))).into_response())
}

/// Validate and submit an order; the terminal's raw acknowledgement is the
/// response body.
async fn place_order<T: TerminalPort>(
    State(state): State<AppState<T>>,
    Json(form): Json<OrderForm>,
) -> Result<Response, ApiError> {
    let intent = form.into_intent();
    match state.place_order.execute(&intent).await? {
        PlacementOutcome::Rejected(verdict) => Ok((
            StatusCode::BAD_REQUEST,
            Json(VerdictResponse::from(&verdict)),
        )
            .into_response()),
        PlacementOutcome::Submitted(ack) => Ok(Json(ack).into_response()),
    }
}

/// Adjust protective levels on an open position.
async fn adjust_stops<T: TerminalPort>(
    State(state): State<AppState<T>>,
    Json(form): Json<AdjustStopForm>,
) -> Result<Response, ApiError> {
    let adjustment = StopAdjustment {
        ticket: form.ticket,
        stop_loss: form.stop_loss,
        take_profit: form.take_profit,
    };
    let ack = state.adjust_stops.execute(&adjustment).await?;
    Ok(Json(ack).into_response())
}

/// Close an open position.
async fn close_position<T: TerminalPort>(
    State(state): State<AppState<T>>,
    Path(ticket): Path<u64>,
) -> Result<Response, ApiError> {
    let ack = state.close_position.execute(ticket).await?;
    Ok(Json(ack).into_response())
}

/// API error with an HTTP status and a stable code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Intent(e) => Self {
                status: StatusCode::BAD_REQUEST,
                code: "MALFORMED_INTENT",
                message: e.to_string(),
            },
            GatewayError::Terminal(e) => e.into(),
            GatewayError::Build(BuildError::MissingQuote) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "TERMINAL_UNAVAILABLE",
                message: "no quote available to price the order".to_string(),
            },
        }
    }
}

impl From<TerminalError> for ApiError {
    fn from(err: TerminalError) -> Self {
        match err {
            TerminalError::SymbolNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                code: "SYMBOL_NOT_FOUND",
                message: err.to_string(),
            },
            TerminalError::PositionNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                code: "POSITION_NOT_FOUND",
                message: err.to_string(),
            },
            TerminalError::Unavailable { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "TERMINAL_UNAVAILABLE",
                message: err.to_string(),
            },
            TerminalError::Rejected { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "TERMINAL_REJECTED",
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                code: self.code.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}
