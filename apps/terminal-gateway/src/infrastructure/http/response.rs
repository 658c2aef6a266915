//! HTTP response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::ports::{HistoricalDeal, HistoricalOrder, PendingOrderInfo, PositionInfo};
use crate::domain::market::SymbolConstraints;
use crate::domain::validation::{RejectionDetail, ValidationVerdict};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status string.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Quote endpoint response: last tick plus the daily range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Symbol.
    pub symbol: String,
    /// Best bid.
    pub bid: f64,
    /// Best ask.
    pub ask: f64,
    /// Last traded price.
    pub last: f64,
    /// Daily low, when the terminal has a session bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_low: Option<f64>,
    /// Daily high, when the terminal has a session bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_high: Option<f64>,
    /// Tick timestamp.
    pub time: DateTime<Utc>,
}

/// Open positions response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsResponse {
    /// Open positions.
    pub positions: Vec<PositionInfo>,
}

/// Pending orders response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrdersResponse {
    /// Working pending orders.
    pub orders: Vec<PendingOrderInfo>,
}

/// Historical orders response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryResponse {
    /// Finished orders inside the window.
    pub orders: Vec<HistoricalOrder>,
}

/// Historical deals response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealHistoryResponse {
    /// Executed deals inside the window.
    pub deals: Vec<HistoricalDeal>,
}

/// Validation verdict as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictResponse {
    /// Whether the order may be submitted.
    pub admissible: bool,
    /// First violated rule, when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionDetail>,
    /// The constraints the decision was made against.
    pub constraints: SymbolConstraints,
}

impl From<&ValidationVerdict> for VerdictResponse {
    fn from(verdict: &ValidationVerdict) -> Self {
        Self {
            admissible: verdict.admissible,
            reason: verdict.reason.as_ref().map(RejectionDetail::from),
            constraints: verdict.constraints.clone(),
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
