//! Infrastructure layer — adapters on both sides of the application core.

pub mod http;
pub mod terminal;
