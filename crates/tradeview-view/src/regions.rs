//! Region identifiers the handlers write into.

use serde::{Deserialize, Serialize};

/// Ids of the page regions. Every field has a default matching the
/// skeleton page served by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionIds {
    #[serde(default = "default_market_status")]
    pub market_status: String,
    #[serde(default = "default_portfolio_balance")]
    pub portfolio_balance: String,
    #[serde(default = "default_account_type")]
    pub account_type: String,
    #[serde(default = "default_buying_power")]
    pub buying_power: String,
    /// Container holding one card per symbol.
    #[serde(default = "default_stock_cards")]
    pub stock_cards: String,
    /// Container holding the trade list or the empty-history message.
    #[serde(default = "default_trade_history")]
    pub trade_history: String,
}

fn default_market_status() -> String {
    "market-status".to_string()
}

fn default_portfolio_balance() -> String {
    "portfolio-balance".to_string()
}

fn default_account_type() -> String {
    "account-type".to_string()
}

fn default_buying_power() -> String {
    "buying-power".to_string()
}

fn default_stock_cards() -> String {
    "stock-cards".to_string()
}

fn default_trade_history() -> String {
    "trade-history".to_string()
}

impl Default for RegionIds {
    fn default() -> Self {
        Self {
            market_status: default_market_status(),
            portfolio_balance: default_portfolio_balance(),
            account_type: default_account_type(),
            buying_power: default_buying_power(),
            stock_cards: default_stock_cards(),
            trade_history: default_trade_history(),
        }
    }
}

impl RegionIds {
    /// Id of the card for `symbol`.
    pub fn card(symbol: &str) -> String {
        format!("card-{symbol}")
    }

    /// Id of the last-action span nested in the card for `symbol`.
    pub fn last_action(symbol: &str) -> String {
        format!("last_action-{symbol}")
    }

    /// Single-text regions with their display labels, in page order.
    pub fn text_regions(&self) -> [(&str, &str); 4] {
        [
            ("Market Status", self.market_status.as_str()),
            ("Portfolio Balance", self.portfolio_balance.as_str()),
            ("Buying Power", self.buying_power.as_str()),
            ("Account Type", self.account_type.as_str()),
        ]
    }
}
