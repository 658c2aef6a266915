//! Dry-run order validation.

use std::sync::Arc;

use super::GatewayError;
use crate::application::ports::{TerminalError, TerminalPort};
use crate::domain::market::Quote;
use crate::domain::order::TradeIntent;
use crate::domain::validation::{ValidationVerdict, validate_order};

/// Use case behind the dry-run endpoint: decide admissibility without
/// submitting anything.
pub struct ValidateOrderUseCase<T: TerminalPort> {
    terminal: Arc<T>,
}

impl<T: TerminalPort> ValidateOrderUseCase<T> {
    /// Create a new use case over the given terminal.
    pub const fn new(terminal: Arc<T>) -> Self {
        Self { terminal }
    }

    /// Resolve fresh constraints and quote, then run the validation
    /// sequence. The verdict is never cached; a later submission validates
    /// again from scratch.
    pub async fn execute(&self, intent: &TradeIntent) -> Result<ValidationVerdict, GatewayError> {
        // Cheapest failure path: structural problems never reach the terminal.
        intent.check_shape()?;

        self.terminal.ensure_symbol(&intent.symbol).await?;
        let constraints = self.terminal.constraints(&intent.symbol).await?;
        let quote = self.resolve_quote(intent).await?;

        let verdict = validate_order(intent, &constraints, quote.as_ref())?;
        tracing::debug!(
            symbol = %intent.symbol,
            kind = %intent.kind(),
            admissible = verdict.admissible,
            reason = verdict.reason.as_ref().map(|r| r.code()),
            "validated order intent"
        );
        Ok(verdict)
    }

    /// A missing quote is a market-state condition, not a hard failure:
    /// the validation rules decide whether it matters for this intent.
    async fn resolve_quote(&self, intent: &TradeIntent) -> Result<Option<Quote>, GatewayError> {
        match self.terminal.quote(&intent.symbol).await {
            Ok(quote) => Ok(Some(quote)),
            Err(TerminalError::Unavailable { message }) => {
                tracing::debug!(symbol = %intent.symbol, message, "no quote available");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTerminalPort;
    use crate::domain::market::{Symbol, SymbolConstraints};
    use crate::domain::order::{ExecutionStyle, IntentError, Side};
    use crate::domain::validation::RejectReason;

    fn constraints() -> SymbolConstraints {
        SymbolConstraints {
            min_volume: Some(0.01),
            max_volume: Some(10.0),
            volume_step: Some(0.01),
            tick_size: Some(0.000_01),
            min_stop_distance_ticks: 100,
        }
    }

    fn intent() -> TradeIntent {
        TradeIntent {
            symbol: Symbol::new("EURUSD"),
            side: Side::Buy,
            style: ExecutionStyle::Market,
            quantity: 0.5,
            price: None,
            stop_loss: None,
            take_profit: None,
        }
    }

    #[tokio::test]
    async fn malformed_intent_never_touches_the_terminal() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_ensure_symbol().never();
        terminal.expect_constraints().never();
        terminal.expect_quote().never();

        let mut bad = intent();
        bad.quantity = -1.0;

        let use_case = ValidateOrderUseCase::new(Arc::new(terminal));
        let result = use_case.execute(&bad).await;
        assert!(matches!(
            result,
            Err(GatewayError::Intent(IntentError::NonPositiveQuantity { .. }))
        ));
    }

    #[tokio::test]
    async fn admissible_intent_returns_verdict_with_echo() {
        let mut terminal = MockTerminalPort::new();
        terminal
            .expect_ensure_symbol()
            .returning(|_| Ok(()));
        terminal
            .expect_constraints()
            .returning(|_| Ok(constraints()));
        terminal.expect_quote().returning(|_| {
            Ok(Quote {
                bid: 1.100_00,
                ask: 1.100_10,
            })
        });

        let use_case = ValidateOrderUseCase::new(Arc::new(terminal));
        let verdict = use_case.execute(&intent()).await.unwrap();
        assert!(verdict.admissible);
        assert_eq!(verdict.constraints, constraints());
    }

    #[tokio::test]
    async fn unknown_symbol_propagates_as_terminal_error() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_ensure_symbol().returning(|symbol| {
            Err(TerminalError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
        });

        let use_case = ValidateOrderUseCase::new(Arc::new(terminal));
        let result = use_case.execute(&intent()).await;
        assert!(matches!(
            result,
            Err(GatewayError::Terminal(TerminalError::SymbolNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn missing_quote_becomes_a_verdict_where_it_matters() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_ensure_symbol().returning(|_| Ok(()));
        terminal
            .expect_constraints()
            .returning(|_| Ok(constraints()));
        terminal.expect_quote().returning(|_| {
            Err(TerminalError::Unavailable {
                message: "no tick".to_string(),
            })
        });

        let mut pending = intent();
        pending.style = ExecutionStyle::Limit;
        pending.price = Some(1.095_00);

        let use_case = ValidateOrderUseCase::new(Arc::new(terminal));
        let verdict = use_case.execute(&pending).await.unwrap();
        assert_eq!(verdict.reason, Some(RejectReason::NoQuote));
    }
}
