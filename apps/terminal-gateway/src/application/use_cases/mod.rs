//! Use cases — orchestration of port calls around the domain core.

mod adjust_stops;
mod close_position;
mod place_order;
mod validate_order;

pub use adjust_stops::{AdjustStopsUseCase, StopAdjustment};
pub use close_position::ClosePositionUseCase;
pub use place_order::{PlaceOrderUseCase, PlacementOutcome};
pub use validate_order::ValidateOrderUseCase;

use crate::domain::order::IntentError;
use crate::domain::request::{BuildError, EntryRequestError};
use crate::application::ports::TerminalError;

/// Failures a use case can surface to the transport layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Structurally invalid client input, rejected before any terminal call.
    #[error(transparent)]
    Intent(#[from] IntentError),

    /// The terminal collaborator failed or refused.
    #[error(transparent)]
    Terminal(#[from] TerminalError),

    /// An admissible order could not be turned into a request.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl From<EntryRequestError> for GatewayError {
    fn from(err: EntryRequestError) -> Self {
        match err {
            EntryRequestError::Intent(e) => Self::Intent(e),
            EntryRequestError::Build(e) => Self::Build(e),
        }
    }
}
