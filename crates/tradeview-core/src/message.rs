//! Push message payloads.
//!
//! Field names follow the JSON the server emits. Optional top-level fields
//! leave their region untouched when absent; `data_list` is required.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::last_action::{LastActionRecord, LastActions};
use crate::timestamp::Timestamp;

/// Periodic account and quote refresh (`data_update`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataUpdateMessage {
    /// "Open" or "Closed".
    #[serde(default)]
    pub market_status: Option<String>,
    /// Account equity.
    #[serde(default)]
    pub portfolio_balance: Option<Decimal>,
    /// "Paper" or "Live".
    #[serde(default)]
    pub account_type: Option<String>,
    /// Buying power reported alongside the balance.
    #[serde(default)]
    pub buying_power: Option<Decimal>,
    /// One snapshot per watched symbol, in display order.
    pub data_list: Vec<SymbolSnapshot>,
    /// Symbol -> last action.
    #[serde(default)]
    pub last_actions: LastActions,
    /// Full trade list, when the server includes it.
    #[serde(default)]
    pub trade_records: Option<Vec<TradeRecord>>,
}

/// Quote snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    /// Last close (or latest trade) price. Null when the quote lookup failed.
    #[serde(default, alias = "current_price")]
    pub last_close: Option<Decimal>,
    #[serde(default)]
    pub last_close_time: Option<Timestamp>,
    pub exchange: String,
    #[serde(default)]
    pub shares_owned: Option<Decimal>,
    #[serde(default)]
    pub value_in_dollars: Option<Decimal>,
    #[serde(default)]
    pub buy_threshold: Option<Decimal>,
    #[serde(default)]
    pub sell_threshold: Option<Decimal>,
}

impl SymbolSnapshot {
    /// Snapshot with only the required fields and a price.
    pub fn new(symbol: impl Into<String>, exchange: impl Into<String>, last_close: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            last_close: Some(last_close),
            last_close_time: None,
            exchange: exchange.into(),
            shares_owned: None,
            value_in_dollars: None,
            buy_threshold: None,
            sell_threshold: None,
        }
    }
}

/// Fill notification (`trade_update`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeUpdateMessage {
    /// Symbol whose last action changed.
    pub symbol: String,
    #[serde(default)]
    pub last_action: Option<LastActionRecord>,
    /// Every trade made so far, oldest first.
    #[serde(default)]
    pub trade_records: Vec<TradeRecord>,
}

/// A filled order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeRecord {
    /// "buy" or "sell".
    pub side: String,
    pub symbol: String,
    pub qty: Decimal,
    pub price: Decimal,
    pub time: Timestamp,
}
