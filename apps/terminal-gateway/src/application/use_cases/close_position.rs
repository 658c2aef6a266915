//! Closing an open position with an opposite-side deal.

use std::sync::Arc;

use super::GatewayError;
use crate::application::ports::{TerminalError, TerminalPort, TradeAck};
use crate::domain::market::Symbol;
use crate::domain::request::{OrderRequest, RequestStamp};

/// Use case behind the close-position endpoint.
pub struct ClosePositionUseCase<T: TerminalPort> {
    terminal: Arc<T>,
    stamp: RequestStamp,
}

impl<T: TerminalPort> ClosePositionUseCase<T> {
    /// Create a new use case over the given terminal.
    pub const fn new(terminal: Arc<T>, stamp: RequestStamp) -> Self {
        Self { terminal, stamp }
    }

    /// Close the position by dealing its full volume on the opposite side
    /// at the current quote.
    pub async fn execute(&self, ticket: u64) -> Result<TradeAck, GatewayError> {
        let position = self
            .terminal
            .position(ticket)
            .await?
            .ok_or(TerminalError::PositionNotFound { ticket })?;

        let symbol = Symbol::new(&position.symbol);
        // Closing needs a live price; without one there is nothing to deal at.
        let quote = self.terminal.quote(&symbol).await?;

        let request = OrderRequest::close_position(
            symbol,
            ticket,
            position.side,
            position.volume,
            &quote,
            &self.stamp,
        );
        tracing::info!(
            ticket,
            symbol = %request.symbol,
            kind = ?request.kind,
            volume = ?request.volume,
            price = ?request.price,
            "closing position"
        );

        Ok(self.terminal.submit(&request).await?)
    }
}
