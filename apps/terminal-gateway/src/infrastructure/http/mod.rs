//! HTTP transport shell (driver adapter).

pub mod request;
pub mod response;

mod controller;

pub use controller::{ApiError, AppState, create_router};
