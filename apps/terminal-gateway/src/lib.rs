// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Terminal Gateway - Rust Core Library
//!
//! HTTP gateway in front of a remote trading terminal. The terminal owns
//! connectivity, account state, live prices and execution; this crate owns
//! the order validation and request-construction engine in between.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: the pure core — order kinds, price normalization, volume /
//!   entry-price / stop-distance validation, verdicts and the terminal
//!   request builder. Synchronous, no I/O, no caching.
//! - **Application**: the `TerminalPort` contract and the use cases that
//!   sequence port calls around the core (`ValidateOrder`, `PlaceOrder`,
//!   `AdjustStops`, `ClosePosition`).
//! - **Infrastructure**: the terminal bridge adapter (reqwest) and the axum
//!   REST controller.
//!
//! Every request re-resolves constraints and quotes from the terminal;
//! nothing is cached and nothing survives the request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - core validation and request construction.
pub mod domain;

/// Application layer - ports and use cases.
pub mod application;

/// Infrastructure layer - adapters and transports.
pub mod infrastructure;

/// Service configuration.
pub mod config;

/// Tracing setup.
pub mod telemetry;

// Domain re-exports
pub use domain::{
    ActionKind, ExecutionStyle, FillPolicy, IntentError, OrderKind, OrderRequest, Quote,
    RejectReason, RequestStamp, Side, Symbol, SymbolConstraints, TimePolicy, TradeIntent,
    ValidationVerdict, build_entry_request, normalize_price, validate_order,
};

// Application re-exports
pub use application::GatewayError;
pub use application::ports::{TerminalError, TerminalPort, TradeAck};
pub use application::use_cases::{
    AdjustStopsUseCase, ClosePositionUseCase, PlaceOrderUseCase, PlacementOutcome, StopAdjustment,
    ValidateOrderUseCase,
};

// Infrastructure re-exports
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::terminal::{BridgeConfig, BridgeError, TerminalBridgeAdapter};
