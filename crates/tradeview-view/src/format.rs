//! Display formatting shared by the handlers.

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tradeview_core::{LastActionState, Timestamp};

pub const NO_ACTION_TAKEN: &str = "No action taken";
pub const NO_TRADES: &str = "No trades have been made yet.";
pub const TIME_NOT_AVAILABLE: &str = "Time data not available";
pub const PRICE_NOT_AVAILABLE: &str = "Price data not available";
/// Rendered for timestamps no decoder understood.
pub const INVALID_DATE: &str = "Invalid Date";

/// en-US `toLocaleString` layout, e.g. `5/14/2024, 1:30:00 PM`.
const LOCALE_LAYOUT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// `$` followed by the value as sent.
pub fn currency(value: Decimal) -> String {
    format!("${value}")
}

/// `$` followed by the value rounded to cents, midpoints away from zero.
pub fn price_2dp(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `<action> at $<price>` or [`NO_ACTION_TAKEN`].
pub fn last_action_text(state: LastActionState<'_>) -> String {
    match state {
        LastActionState::Taken {
            action,
            price: Some(price),
        } => format!("{action} at {}", currency(price)),
        LastActionState::Taken { action, price: None } => action.to_string(),
        LastActionState::NoAction => NO_ACTION_TAKEN.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Local,
    Fixed(FixedOffset),
}

/// Renders timestamps in a display time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFormat {
    zone: Zone,
}

impl TimeFormat {
    /// Use the host's local time zone.
    pub fn local() -> Self {
        Self { zone: Zone::Local }
    }

    pub fn utc() -> Self {
        Self::fixed(Utc.fix())
    }

    pub fn fixed(offset: FixedOffset) -> Self {
        Self {
            zone: Zone::Fixed(offset),
        }
    }

    /// Fixed offset east of UTC in minutes. `None` if out of range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::fixed)
    }

    pub fn format_instant(&self, instant: DateTime<Utc>) -> String {
        match self.zone {
            Zone::Local => instant.with_timezone(&Local).format(LOCALE_LAYOUT).to_string(),
            Zone::Fixed(offset) => instant.with_timezone(&offset).format(LOCALE_LAYOUT).to_string(),
        }
    }

    pub fn format(&self, timestamp: &Timestamp) -> String {
        match timestamp {
            Timestamp::At(instant) => self.format_instant(*instant),
            // Already wall-clock time in the display zone.
            Timestamp::Naive(local) => local.format(LOCALE_LAYOUT).to_string(),
            Timestamp::Unparsed(_) => INVALID_DATE.to_string(),
        }
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self::local()
    }
}
