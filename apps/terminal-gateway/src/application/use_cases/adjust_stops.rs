//! Stop-loss / take-profit adjustment on an open position.

use std::sync::Arc;

use super::GatewayError;
use crate::application::ports::{TerminalError, TerminalPort, TradeAck};
use crate::domain::market::Symbol;
use crate::domain::order::IntentError;
use crate::domain::request::OrderRequest;

/// A requested adjustment. Omitted levels keep their broker-side values.
#[derive(Debug, Clone, Copy)]
pub struct StopAdjustment {
    /// Ticket of the position to adjust.
    pub ticket: u64,
    /// New stop-loss, or `None` to leave it untouched.
    pub stop_loss: Option<f64>,
    /// New take-profit, or `None` to leave it untouched.
    pub take_profit: Option<f64>,
}

/// Use case behind the stop-adjustment endpoint.
pub struct AdjustStopsUseCase<T: TerminalPort> {
    terminal: Arc<T>,
    magic: u64,
}

impl<T: TerminalPort> AdjustStopsUseCase<T> {
    /// Create a new use case over the given terminal.
    pub const fn new(terminal: Arc<T>, magic: u64) -> Self {
        Self { terminal, magic }
    }

    /// Look the position up, merge omitted levels with the current ones and
    /// submit a stop-modification request.
    pub async fn execute(&self, adjustment: &StopAdjustment) -> Result<TradeAck, GatewayError> {
        if adjustment.stop_loss.is_some_and(|p| !p.is_finite()) {
            return Err(IntentError::NonFinite { field: "stop_loss" }.into());
        }
        if adjustment.take_profit.is_some_and(|p| !p.is_finite()) {
            return Err(IntentError::NonFinite {
                field: "take_profit",
            }
            .into());
        }

        let position = self
            .terminal
            .position(adjustment.ticket)
            .await?
            .ok_or(TerminalError::PositionNotFound {
                ticket: adjustment.ticket,
            })?;

        // Merge before building: an omitted field must never wipe an
        // existing broker-side level.
        let stop_loss = adjustment.stop_loss.or(position.stop_loss);
        let take_profit = adjustment.take_profit.or(position.take_profit);

        let request = OrderRequest::modify_stops(
            Symbol::new(&position.symbol),
            adjustment.ticket,
            stop_loss,
            take_profit,
            self.magic,
        );
        tracing::info!(
            ticket = adjustment.ticket,
            symbol = %request.symbol,
            stop_loss = ?request.stop_loss,
            take_profit = ?request.take_profit,
            "adjusting protective levels"
        );

        Ok(self.terminal.submit(&request).await?)
    }
}
