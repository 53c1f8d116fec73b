//! Push-update handlers.
//!
//! Each handler is a pure function of (message, render target): it reads
//! fields by name and rewrites the matching regions from scratch. No state
//! is kept between calls, so replaying a message reproduces the same page.

use tracing::{debug, trace};
use tradeview_core::{
    DataUpdateMessage, InboundMessage, LastActions, SymbolSnapshot, TradeRecord,
    TradeUpdateMessage,
};

use crate::error::ViewResult;
use crate::format::{
    capitalize, currency, last_action_text, price_2dp, TimeFormat, NO_TRADES,
    PRICE_NOT_AVAILABLE, TIME_NOT_AVAILABLE,
};
use crate::node::{Element, Node};
use crate::regions::RegionIds;
use crate::target::RenderTarget;

/// Which regions a handler call touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Regions whose content changed.
    pub updated: Vec<String>,
    /// Regions rewritten with identical content.
    pub unchanged: Vec<String>,
    /// Regions not present in the target.
    pub skipped: Vec<String>,
}

impl RenderReport {
    fn record(&mut self, region: &str, changed: bool) {
        if changed {
            self.updated.push(region.to_string());
        } else {
            self.unchanged.push(region.to_string());
        }
    }

    /// True if nothing changed.
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty()
    }
}

/// Applies inbound messages to a render target.
#[derive(Debug, Clone, Default)]
pub struct ViewUpdater {
    regions: RegionIds,
    time_format: TimeFormat,
}

impl ViewUpdater {
    pub fn new(regions: RegionIds, time_format: TimeFormat) -> Self {
        Self {
            regions,
            time_format,
        }
    }

    pub fn regions(&self) -> &RegionIds {
        &self.regions
    }

    /// Dispatch an inbound message to its handler.
    pub fn handle<T>(&self, target: &mut T, msg: &InboundMessage) -> ViewResult<RenderReport>
    where
        T: RenderTarget + ?Sized,
    {
        match msg {
            InboundMessage::DataUpdate(data) => self.on_data_update(target, data),
            InboundMessage::TradeUpdate(trade) => self.on_trade_update(target, trade),
        }
    }

    /// Apply a `data_update`.
    ///
    /// Optional summary fields only overwrite their region when present.
    /// The card container is always rebuilt from `data_list`.
    pub fn on_data_update<T>(
        &self,
        target: &mut T,
        msg: &DataUpdateMessage,
    ) -> ViewResult<RenderReport>
    where
        T: RenderTarget + ?Sized,
    {
        let mut report = RenderReport::default();
        let regions = &self.regions;

        if let Some(status) = &msg.market_status {
            write_text(target, &regions.market_status, status, &mut report)?;
        }
        if let Some(balance) = msg.portfolio_balance {
            write_text(target, &regions.portfolio_balance, &currency(balance), &mut report)?;
        }
        if let Some(account_type) = &msg.account_type {
            write_text(target, &regions.account_type, account_type, &mut report)?;
        }
        if let Some(buying_power) = msg.buying_power {
            write_text(target, &regions.buying_power, &currency(buying_power), &mut report)?;
        }

        let cards = self.stock_cards(&msg.data_list, &msg.last_actions);
        write_children(target, &regions.stock_cards, cards, &mut report)?;

        if let Some(trades) = &msg.trade_records {
            let history = self.trade_history(trades);
            write_children(target, &regions.trade_history, history, &mut report)?;
        }

        debug!(
            symbols = msg.data_list.len(),
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            "Applied data update"
        );
        Ok(report)
    }

    /// Apply a `trade_update`.
    ///
    /// The last-action span is only written when the symbol's card is on
    /// the page.
    pub fn on_trade_update<T>(
        &self,
        target: &mut T,
        msg: &TradeUpdateMessage,
    ) -> ViewResult<RenderReport>
    where
        T: RenderTarget + ?Sized,
    {
        let mut report = RenderReport::default();

        if let Some(last_action) = &msg.last_action {
            let region = RegionIds::last_action(&msg.symbol);
            let text = last_action_text(last_action.state());
            write_text(target, &region, &text, &mut report)?;
        }

        let history = self.trade_history(&msg.trade_records);
        write_children(target, &self.regions.trade_history, history, &mut report)?;

        debug!(
            symbol = %msg.symbol,
            trades = msg.trade_records.len(),
            updated = report.updated.len(),
            "Applied trade update"
        );
        Ok(report)
    }

    /// One card per snapshot, in order.
    pub fn stock_cards(&self, snapshots: &[SymbolSnapshot], last_actions: &LastActions) -> Vec<Node> {
        snapshots
            .iter()
            .map(|snapshot| self.stock_card(snapshot, last_actions).into())
            .collect()
    }

    pub fn stock_card(&self, snapshot: &SymbolSnapshot, last_actions: &LastActions) -> Element {
        let symbol = snapshot.symbol.as_str();

        let price = snapshot
            .last_close
            .map_or_else(|| PRICE_NOT_AVAILABLE.to_string(), price_2dp);
        let time = snapshot
            .last_close_time
            .as_ref()
            .map_or_else(|| TIME_NOT_AVAILABLE.to_string(), |t| self.time_format.format(t));

        let mut card = Element::new("div")
            .with_id(RegionIds::card(symbol))
            .with_class("stock-card")
            .child(Element::new("h2").text(symbol))
            .child(labelled("Last Close", price))
            .child(labelled("Last Close Time", time))
            .child(labelled("Exchange", snapshot.exchange.as_str()));

        if let Some(shares) = snapshot.shares_owned {
            card = card.child(labelled("Shares Owned", shares.to_string()));
        }
        if let Some(value) = snapshot.value_in_dollars {
            card = card.child(labelled("Value", price_2dp(value)));
        }
        if let Some(threshold) = snapshot.buy_threshold {
            card = card.child(labelled("Buy Threshold", currency(threshold)));
        }
        if let Some(threshold) = snapshot.sell_threshold {
            card = card.child(labelled("Sell Threshold", currency(threshold)));
        }

        let last_action = Element::new("span")
            .with_id(RegionIds::last_action(symbol))
            .with_class("last-action")
            .text(last_action_text(last_actions.lookup(symbol)));

        card.child(
            Element::new("p")
                .child(Element::new("strong").text("Last Action:"))
                .text(" ")
                .child(last_action),
        )
    }

    /// The trade list, or the empty-history message.
    pub fn trade_history(&self, trades: &[TradeRecord]) -> Vec<Node> {
        if trades.is_empty() {
            return vec![Element::new("p").with_class("no-trades").text(NO_TRADES).into()];
        }

        let list = trades
            .iter()
            .fold(Element::new("ol"), |list, trade| list.child(self.trade_entry(trade)));
        vec![list.into()]
    }

    pub fn trade_entry(&self, trade: &TradeRecord) -> Element {
        Element::new("li")
            .child(Element::new("strong").text(format!("{}:", capitalize(&trade.side))))
            .text(format!(
                " {} - {} shares at {} on {}",
                trade.symbol,
                trade.qty,
                currency(trade.price),
                self.time_format.format(&trade.time)
            ))
    }
}

fn labelled(label: &str, value: impl Into<String>) -> Element {
    Element::new("p")
        .child(Element::new("strong").text(format!("{label}:")))
        .text(format!(" {}", value.into()))
}

fn write_text<T>(target: &mut T, region: &str, text: &str, report: &mut RenderReport) -> ViewResult<()>
where
    T: RenderTarget + ?Sized,
{
    if !target.contains(region) {
        debug!(region, "Region not on page, skipping");
        report.skipped.push(region.to_string());
        return Ok(());
    }
    let changed = target.set_text(region, text)?;
    trace!(region, changed, "Wrote region text");
    report.record(region, changed);
    Ok(())
}

fn write_children<T>(
    target: &mut T,
    region: &str,
    nodes: Vec<Node>,
    report: &mut RenderReport,
) -> ViewResult<()>
where
    T: RenderTarget + ?Sized,
{
    if !target.contains(region) {
        debug!(region, "Region not on page, skipping");
        report.skipped.push(region.to_string());
        return Ok(());
    }
    let changed = target.replace_children(region, nodes)?;
    trace!(region, changed, "Replaced region children");
    report.record(region, changed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::ViewError;
    use crate::format::NO_ACTION_TAKEN;
    use crate::target::MockRenderTarget;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tradeview_core::{LastActionRecord, Timestamp};

    fn updater() -> ViewUpdater {
        ViewUpdater::new(RegionIds::default(), TimeFormat::utc())
    }

    fn page() -> Document {
        Document::skeleton(&RegionIds::default())
    }

    fn trade_time() -> Timestamp {
        Timestamp::At(Utc.with_ymd_and_hms(2024, 5, 14, 13, 30, 0).unwrap())
    }

    fn full_data_update() -> DataUpdateMessage {
        let mut snapshot = SymbolSnapshot::new("FFIE", "NASDAQ", dec!(0.58));
        snapshot.last_close_time = Some(trade_time());

        let mut last_actions = LastActions::new();
        last_actions.insert("FFIE", LastActionRecord::new("Buy", dec!(0.58)));

        DataUpdateMessage {
            market_status: Some("Open".to_string()),
            portfolio_balance: Some(dec!(100000.25)),
            account_type: Some("Paper".to_string()),
            buying_power: Some(dec!(200000.5)),
            data_list: vec![snapshot, SymbolSnapshot::new("NXTC", "NASDAQ", dec!(1.2))],
            last_actions,
            trade_records: None,
        }
    }

    fn buy_abc() -> TradeRecord {
        TradeRecord {
            side: "buy".to_string(),
            symbol: "ABC".to_string(),
            qty: dec!(10),
            price: dec!(5.5),
            time: trade_time(),
        }
    }

    #[test]
    fn test_data_update_sets_summary_regions() {
        let mut doc = page();
        updater().on_data_update(&mut doc, &full_data_update()).unwrap();

        assert_eq!(doc.text_of("market-status").as_deref(), Some("Open"));
        assert_eq!(doc.text_of("portfolio-balance").as_deref(), Some("$100000.25"));
        assert_eq!(doc.text_of("account-type").as_deref(), Some("Paper"));
        assert_eq!(doc.text_of("buying-power").as_deref(), Some("$200000.5"));
    }

    #[test]
    fn test_data_update_absent_fields_leave_regions_unchanged() {
        let mut doc = page();
        let view = updater();
        view.on_data_update(&mut doc, &full_data_update()).unwrap();

        let sparse = DataUpdateMessage {
            data_list: vec![],
            ..Default::default()
        };
        let report = view.on_data_update(&mut doc, &sparse).unwrap();

        assert_eq!(report.updated, vec!["stock-cards".to_string()]);
        assert_eq!(doc.text_of("market-status").as_deref(), Some("Open"));
        assert_eq!(doc.text_of("portfolio-balance").as_deref(), Some("$100000.25"));
        assert_eq!(doc.text_of("account-type").as_deref(), Some("Paper"));
    }

    #[test]
    fn test_stock_cards_render_in_order() {
        let mut doc = page();
        updater().on_data_update(&mut doc, &full_data_update()).unwrap();

        let container = doc.element("stock-cards").unwrap();
        let ids: Vec<_> = container
            .children
            .iter()
            .filter_map(Node::as_element)
            .map(|card| card.id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["card-FFIE", "card-NXTC"]);

        let card = doc.text_of("card-FFIE").unwrap();
        assert!(card.contains("Last Close: $0.58"));
        assert!(card.contains("Last Close Time: 5/14/2024, 1:30:00 PM"));
        assert!(card.contains("Exchange: NASDAQ"));
        assert_eq!(doc.text_of("last_action-FFIE").as_deref(), Some("Buy at $0.58"));
    }

    #[test]
    fn test_missing_last_action_and_time_use_fallbacks() {
        let mut doc = page();
        updater().on_data_update(&mut doc, &full_data_update()).unwrap();

        assert_eq!(doc.text_of("last_action-NXTC").as_deref(), Some(NO_ACTION_TAKEN));
        assert!(doc
            .text_of("card-NXTC")
            .unwrap()
            .contains(TIME_NOT_AVAILABLE));
    }

    #[test]
    fn test_missing_price_uses_fallback() {
        let mut snapshot = SymbolSnapshot::new("RGF", "NASDAQ", dec!(0));
        snapshot.last_close = None;
        let card = updater().stock_card(&snapshot, &LastActions::new());

        assert!(card.text_content().contains(PRICE_NOT_AVAILABLE));
    }

    #[test]
    fn test_stock_cards_rerender_is_idempotent() {
        let mut doc = page();
        let view = updater();
        let msg = full_data_update();

        view.on_data_update(&mut doc, &msg).unwrap();
        let first = doc.element("stock-cards").unwrap().to_html();

        let report = view.on_data_update(&mut doc, &msg).unwrap();
        let second = doc.element("stock-cards").unwrap().to_html();

        assert_eq!(first, second);
        assert!(report.is_noop());
        assert!(report.unchanged.contains(&"stock-cards".to_string()));
    }

    #[test]
    fn test_empty_trade_history_renders_fallback() {
        let mut doc = page();
        let msg = TradeUpdateMessage {
            symbol: "ABC".to_string(),
            last_action: None,
            trade_records: vec![],
        };
        updater().on_trade_update(&mut doc, &msg).unwrap();

        let history = doc.element("trade-history").unwrap();
        assert_eq!(history.text_content(), NO_TRADES);
        assert!(!history.to_html().contains("<ol"));
    }

    #[test]
    fn test_single_trade_entry_text() {
        let mut doc = page();
        let msg = TradeUpdateMessage {
            symbol: "ABC".to_string(),
            last_action: None,
            trade_records: vec![buy_abc()],
        };
        updater().on_trade_update(&mut doc, &msg).unwrap();

        let history = doc.element("trade-history").unwrap();
        let list = history.children[0].as_element().unwrap();
        assert_eq!(list.tag, "ol");
        assert_eq!(list.children.len(), 1);
        assert_eq!(
            list.children[0].text_content(),
            "Buy: ABC - 10 shares at $5.5 on 5/14/2024, 1:30:00 PM"
        );
    }

    #[test]
    fn test_trade_update_rewrites_rendered_last_action() {
        let mut doc = page();
        let view = updater();
        view.on_data_update(&mut doc, &full_data_update()).unwrap();

        let msg = TradeUpdateMessage {
            symbol: "NXTC".to_string(),
            last_action: Some(LastActionRecord::new("Sell", dec!(1.21))),
            trade_records: vec![],
        };
        let report = view.on_trade_update(&mut doc, &msg).unwrap();

        assert!(report.updated.contains(&"last_action-NXTC".to_string()));
        assert_eq!(doc.text_of("last_action-NXTC").as_deref(), Some("Sell at $1.21"));
    }

    #[test]
    fn test_trade_update_without_card_skips_last_action() {
        let mut doc = page();
        let msg = TradeUpdateMessage {
            symbol: "ABC".to_string(),
            last_action: Some(LastActionRecord::new("Buy", dec!(5.5))),
            trade_records: vec![buy_abc()],
        };
        let report = updater().on_trade_update(&mut doc, &msg).unwrap();

        assert_eq!(report.skipped, vec!["last_action-ABC".to_string()]);
        assert!(report.updated.contains(&"trade-history".to_string()));
    }

    #[test]
    fn test_data_update_with_trade_records_renders_history() {
        let mut doc = page();
        let msg = DataUpdateMessage {
            data_list: vec![],
            trade_records: Some(vec![buy_abc()]),
            ..Default::default()
        };
        updater().on_data_update(&mut doc, &msg).unwrap();

        assert!(doc
            .text_of("trade-history")
            .unwrap()
            .starts_with("Buy: ABC - 10 shares"));
    }

    #[test]
    fn test_data_update_with_empty_trade_records_renders_fallback() {
        let mut doc = page();
        let msg = DataUpdateMessage {
            data_list: vec![],
            trade_records: Some(vec![]),
            ..Default::default()
        };
        let report = updater().on_data_update(&mut doc, &msg).unwrap();

        assert!(report.updated.contains(&"trade-history".to_string()));
        assert_eq!(doc.text_of("trade-history").as_deref(), Some(NO_TRADES));
    }

    #[test]
    fn test_duplicate_symbol_aborts_after_partial_update() {
        let mut doc = page();
        let mut msg = full_data_update();
        msg.data_list.push(SymbolSnapshot::new("FFIE", "NASDAQ", dec!(0.6)));

        let err = updater().on_data_update(&mut doc, &msg).unwrap_err();

        assert_eq!(err, ViewError::DuplicateId("card-FFIE".to_string()));
        assert_eq!(doc.text_of("market-status").as_deref(), Some("Open"));
        assert_eq!(doc.text_of("stock-cards").as_deref(), Some(""));
    }

    #[test]
    fn test_missing_summary_region_is_skipped() {
        let mut target = MockRenderTarget::new();
        target
            .expect_contains()
            .returning(|region| region != "market-status");
        target.expect_set_text().never();
        target
            .expect_replace_children()
            .times(1)
            .returning(|_, _| Ok(true));

        let msg = DataUpdateMessage {
            market_status: Some("Closed".to_string()),
            data_list: vec![],
            ..Default::default()
        };
        let report = updater().on_data_update(&mut target, &msg).unwrap();

        assert_eq!(report.skipped, vec!["market-status".to_string()]);
        assert_eq!(report.updated, vec!["stock-cards".to_string()]);
    }

    #[test]
    fn test_handle_dispatches_by_kind() {
        let mut doc = page();
        let msg = InboundMessage::TradeUpdate(TradeUpdateMessage {
            symbol: "ABC".to_string(),
            last_action: None,
            trade_records: vec![],
        });
        let report = updater().handle(&mut doc, &msg).unwrap();

        assert_eq!(report.updated, vec!["trade-history".to_string()]);
    }
}
