//! Terminal Gateway Binary
//!
//! Starts the HTTP gateway in front of the terminal bridge.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin terminal-gateway
//! ```
//!
//! # Environment Variables
//!
//! - `MESA_CONFIG`: Path to a YAML config file (optional)
//! - `MESA_HTTP_PORT`: HTTP server port (default: 8080)
//! - `MESA_BIND_ADDRESS`: Bind address (default: 0.0.0.0)
//! - `MESA_BRIDGE_URL`: Terminal bridge base URL (default: <http://127.0.0.1:5001>)
//! - `MESA_BRIDGE_TIMEOUT_SECS`: Bridge request timeout (default: 30)
//! - `MESA_MAGIC`: Expert id stamped on requests (default: 1001)
//! - `MESA_DEVIATION`: Max slippage for immediate deals (default: 20)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use terminal_gateway::application::use_cases::{
    AdjustStopsUseCase, ClosePositionUseCase, PlaceOrderUseCase, ValidateOrderUseCase,
};
use terminal_gateway::config::Config;
use terminal_gateway::infrastructure::http::{AppState, create_router};
use terminal_gateway::infrastructure::terminal::TerminalBridgeAdapter;
use terminal_gateway::telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init_tracing();

    tracing::info!("starting terminal gateway");

    let config = Config::load(std::env::var("MESA_CONFIG").ok().as_deref())?;
    tracing::info!(
        http_port = config.server.http_port,
        bridge_url = %config.terminal.base_url,
        magic = config.trading.magic,
        "configuration loaded"
    );

    let terminal = Arc::new(TerminalBridgeAdapter::new(&config.terminal.bridge_config())?);
    let state = build_state(&terminal, &config);
    let app = create_router(state);

    let addr: SocketAddr = format!(
        "{}:{}",
        config.server.bind_address, config.server.http_port
    )
    .parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("terminal gateway stopped");
    Ok(())
}

/// Wire the use cases together for dependency injection.
fn build_state(
    terminal: &Arc<TerminalBridgeAdapter>,
    config: &Config,
) -> AppState<TerminalBridgeAdapter> {
    let stamp = config.trading.stamp();
    AppState {
        terminal: Arc::clone(terminal),
        validate_order: Arc::new(ValidateOrderUseCase::new(Arc::clone(terminal))),
        place_order: Arc::new(PlaceOrderUseCase::new(Arc::clone(terminal), stamp)),
        adjust_stops: Arc::new(AdjustStopsUseCase::new(
            Arc::clone(terminal),
            config.trading.magic,
        )),
        close_position: Arc::new(ClosePositionUseCase::new(Arc::clone(terminal), stamp)),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Load .env from the working directory, ignoring absence.
fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Resolve on ctrl-c.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}
