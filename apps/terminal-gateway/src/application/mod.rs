//! Application layer — ports and use cases.

pub mod ports;
pub mod use_cases;

pub use use_cases::GatewayError;
