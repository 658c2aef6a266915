//! Terminal bridge adapter (driven adapter).
//!
//! Implements [`crate::application::ports::TerminalPort`] against the REST
//! bridge that fronts the trading terminal.

pub mod api_types;
pub mod config;
pub mod error;
mod http_client;

mod adapter;

pub use adapter::TerminalBridgeAdapter;
pub use config::{BridgeConfig, RetryConfig};
pub use error::BridgeError;
