//! Entry-price validation for resting (limit/stop) orders.
//!
//! A limit order must rest on the favorable side of the current quote, a
//! stop order on the unfavorable side; anything else would either fill
//! immediately or never trigger the way the client meant it to.

use super::RejectReason;
use crate::domain::market::Quote;
use crate::domain::order::OrderKind;

/// Check a normalized entry price against the current quote.
///
/// Market kinds carry no entry price and always pass. Quote absence is
/// handled by the orchestrator before this rule runs.
pub fn check(kind: OrderKind, price: f64, quote: &Quote) -> Result<(), RejectReason> {
    match kind {
        OrderKind::BuyMarket | OrderKind::SellMarket => Ok(()),
        OrderKind::BuyLimit => {
            if price > quote.ask {
                Err(RejectReason::LimitPriceTooHigh {
                    price,
                    ask: quote.ask,
                })
            } else {
                Ok(())
            }
        }
        OrderKind::SellLimit => {
            if price < quote.bid {
                Err(RejectReason::LimitPriceTooLow {
                    price,
                    bid: quote.bid,
                })
            } else {
                Ok(())
            }
        }
        OrderKind::BuyStop => {
            if price < quote.ask {
                Err(RejectReason::StopPriceTooLow {
                    price,
                    ask: quote.ask,
                })
            } else {
                Ok(())
            }
        }
        OrderKind::SellStop => {
            if price > quote.bid {
                Err(RejectReason::StopPriceTooHigh {
                    price,
                    bid: quote.bid,
                })
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const QUOTE: Quote = Quote {
        bid: 1.100_00,
        ask: 1.100_10,
    };

    #[test_case(OrderKind::BuyLimit, 1.095_00; "buy limit below ask")]
    #[test_case(OrderKind::BuyLimit, 1.100_10; "buy limit exactly at ask")]
    #[test_case(OrderKind::SellLimit, 1.105_00; "sell limit above bid")]
    #[test_case(OrderKind::SellLimit, 1.100_00; "sell limit exactly at bid")]
    #[test_case(OrderKind::BuyStop, 1.105_00; "buy stop above ask")]
    #[test_case(OrderKind::BuyStop, 1.100_10; "buy stop exactly at ask")]
    #[test_case(OrderKind::SellStop, 1.095_00; "sell stop below bid")]
    #[test_case(OrderKind::SellStop, 1.100_00; "sell stop exactly at bid")]
    fn accepts_prices_on_the_correct_side(kind: OrderKind, price: f64) {
        assert_eq!(check(kind, price, &QUOTE), Ok(()));
    }

    #[test]
    fn buy_limit_above_ask_rejects() {
        assert!(matches!(
            check(OrderKind::BuyLimit, 1.105_00, &QUOTE),
            Err(RejectReason::LimitPriceTooHigh { .. })
        ));
    }

    #[test]
    fn sell_limit_below_bid_rejects() {
        assert!(matches!(
            check(OrderKind::SellLimit, 1.095_00, &QUOTE),
            Err(RejectReason::LimitPriceTooLow { .. })
        ));
    }

    #[test]
    fn buy_stop_below_ask_rejects() {
        assert!(matches!(
            check(OrderKind::BuyStop, 1.095_00, &QUOTE),
            Err(RejectReason::StopPriceTooLow { .. })
        ));
    }

    #[test]
    fn sell_stop_above_bid_rejects() {
        assert!(matches!(
            check(OrderKind::SellStop, 1.105_00, &QUOTE),
            Err(RejectReason::StopPriceTooHigh { .. })
        ));
    }

    #[test]
    fn market_kinds_always_pass() {
        assert_eq!(check(OrderKind::BuyMarket, 0.0, &QUOTE), Ok(()));
        assert_eq!(check(OrderKind::SellMarket, 99.0, &QUOTE), Ok(()));
    }
}
