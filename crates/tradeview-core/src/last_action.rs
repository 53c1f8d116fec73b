//! Last-action records and the per-symbol lookup.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Most recent trade decision for a symbol.
///
/// The server seeds every symbol with `{"action": null, "price": null}`
/// before the first fill, so both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LastActionRecord {
    /// "Buy", "Sell", "Hold", ...
    #[serde(default)]
    pub action: Option<String>,
    /// Fill price of that action.
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl LastActionRecord {
    pub fn new(action: impl Into<String>, price: Decimal) -> Self {
        Self {
            action: Some(action.into()),
            price: Some(price),
        }
    }

    /// Classify this record. A record without an action counts as no action.
    pub fn state(&self) -> LastActionState<'_> {
        match self.action.as_deref() {
            Some(action) if !action.is_empty() => LastActionState::Taken {
                action,
                price: self.price,
            },
            _ => LastActionState::NoAction,
        }
    }
}

/// Result of a last-action lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastActionState<'a> {
    /// An action was recorded.
    Taken {
        action: &'a str,
        price: Option<Decimal>,
    },
    /// Nothing recorded (missing entry, null entry or null action).
    NoAction,
}

/// Mapping from symbol to its last action.
///
/// Lookups are total: every symbol resolves to a [`LastActionState`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LastActions(HashMap<String, Option<LastActionRecord>>);

impl LastActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `symbol`.
    pub fn insert(&mut self, symbol: impl Into<String>, record: LastActionRecord) {
        self.0.insert(symbol.into(), Some(record));
    }

    /// Resolve the last action for `symbol`.
    pub fn lookup(&self, symbol: &str) -> LastActionState<'_> {
        self.0
            .get(symbol)
            .and_then(Option::as_ref)
            .map_or(LastActionState::NoAction, LastActionRecord::state)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, LastActionRecord)> for LastActions {
    fn from_iter<I: IntoIterator<Item = (String, LastActionRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, Some(v))).collect())
    }
}
