//! Order placement: re-validate, build, submit.

use std::sync::Arc;

use super::GatewayError;
use crate::application::ports::{TerminalError, TerminalPort, TradeAck};
use crate::domain::order::TradeIntent;
use crate::domain::request::{RequestStamp, build_entry_request};
use crate::domain::validation::{ValidationVerdict, validate_order};

/// Outcome of a placement attempt.
#[derive(Debug, Clone)]
pub enum PlacementOutcome {
    /// The intent failed validation; nothing was submitted.
    Rejected(ValidationVerdict),
    /// The request was submitted; the terminal's raw acknowledgement.
    Submitted(TradeAck),
}

/// Use case behind the submission endpoint.
///
/// Validation always runs again here, against constraints and a quote
/// resolved in this same pass — a dry-run verdict from moments earlier may
/// already be stale.
pub struct PlaceOrderUseCase<T: TerminalPort> {
    terminal: Arc<T>,
    stamp: RequestStamp,
}

impl<T: TerminalPort> PlaceOrderUseCase<T> {
    /// Create a new use case over the given terminal.
    pub const fn new(terminal: Arc<T>, stamp: RequestStamp) -> Self {
        Self { terminal, stamp }
    }

    /// Validate the intent and, when admissible, build and submit the
    /// terminal request. The acknowledgement is returned unmodified, even
    /// when its return code encodes a terminal-side rejection.
    pub async fn execute(&self, intent: &TradeIntent) -> Result<PlacementOutcome, GatewayError> {
        intent.check_shape()?;

        self.terminal.ensure_symbol(&intent.symbol).await?;
        let constraints = self.terminal.constraints(&intent.symbol).await?;
        let quote = match self.terminal.quote(&intent.symbol).await {
            Ok(quote) => Some(quote),
            Err(TerminalError::Unavailable { .. }) => None,
            Err(e) => return Err(e.into()),
        };

        let verdict = validate_order(intent, &constraints, quote.as_ref())?;
        if !verdict.admissible {
            tracing::info!(
                symbol = %intent.symbol,
                kind = %intent.kind(),
                reason = verdict.reason.as_ref().map(|r| r.code()),
                "order rejected before submission"
            );
            return Ok(PlacementOutcome::Rejected(verdict));
        }

        let request = build_entry_request(intent, &constraints, quote.as_ref(), &self.stamp)?;
        tracing::info!(
            symbol = %request.symbol,
            action = ?request.action,
            kind = ?request.kind,
            volume = ?request.volume,
            price = ?request.price,
            tag = %request.tag,
            "submitting order"
        );

        let ack = self.terminal.submit(&request).await?;
        tracing::info!(
            retcode = ack.retcode,
            order = ack.order,
            deal = ack.deal,
            "terminal acknowledged order"
        );
        Ok(PlacementOutcome::Submitted(ack))
    }
}
