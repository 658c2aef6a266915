//! Port definitions — interfaces the application layer drives.

mod terminal;

pub use terminal::{
    AccountSummary, DailyRange, HistoricalDeal, HistoricalOrder, PendingOrderInfo, PositionInfo,
    TerminalError, TerminalPort, TerminalStatus, Tick, TradeAck,
};

#[cfg(test)]
pub use terminal::MockTerminalPort;
