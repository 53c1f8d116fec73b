//! In-memory render target.

use crate::error::{ViewError, ViewResult};
use crate::node::{Element, Node};
use crate::regions::RegionIds;
use crate::target::RenderTarget;

/// Page title used by [`Document::skeleton`].
const PAGE_TITLE: &str = "Trading Dashboard";

/// A page held as a node tree.
///
/// Element ids are unique across the document; writes that would break
/// this are rejected with [`ViewError::DuplicateId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    body: Element,
}

impl Document {
    pub fn new(title: impl Into<String>, body: Element) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }

    /// Build the dashboard page with every region in `regions`, all empty.
    pub fn skeleton(regions: &RegionIds) -> Self {
        let mut summary = Element::new("section").with_class("account-summary");
        for (label, id) in regions.text_regions() {
            summary = summary.child(
                Element::new("p")
                    .child(Element::new("strong").text(format!("{label}:")))
                    .text(" ")
                    .child(Element::new("span").with_id(id)),
            );
        }

        let stocks = Element::new("section")
            .with_class("stocks")
            .child(Element::new("h2").text("Stocks"))
            .child(
                Element::new("div")
                    .with_id(&regions.stock_cards)
                    .with_class("stock-list"),
            );

        let history = Element::new("section")
            .with_class("trade-history")
            .child(Element::new("h2").text("Trade History"))
            .child(Element::new("div").with_id(&regions.trade_history));

        let body = Element::new("body")
            .child(Element::new("header").child(Element::new("h1").text(PAGE_TITLE)))
            .child(summary)
            .child(stocks)
            .child(history);

        Self::new(PAGE_TITLE, body)
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Element with the given id.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.body.find(id)
    }

    /// Text content of a region.
    pub fn text_of(&self, region: &str) -> Option<String> {
        self.element(region).map(Element::text_content)
    }

    /// Serialize the whole page.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>");
        out.push_str(&Node::text(self.title.as_str()).to_html());
        out.push_str("</title></head>");
        out.push_str(&self.body.to_html());
        out.push_str("</html>");
        out
    }

    /// Ids that would clash with `nodes` if they were placed under `region`.
    fn check_unique_ids(&self, region: &str, nodes: &[Node]) -> ViewResult<()> {
        let mut outside = Vec::new();
        self.body.collect_ids(Some(region), &mut outside);

        let mut incoming = Vec::new();
        for element in nodes.iter().filter_map(Node::as_element) {
            element.collect_ids(None, &mut incoming);
        }

        for (i, id) in incoming.iter().enumerate() {
            if outside.contains(id) || incoming[..i].contains(id) {
                return Err(ViewError::DuplicateId((*id).to_string()));
            }
        }
        Ok(())
    }
}

impl RenderTarget for Document {
    fn contains(&self, region: &str) -> bool {
        self.element(region).is_some()
    }

    fn set_text(&mut self, region: &str, text: &str) -> ViewResult<bool> {
        self.replace_children(region, vec![Node::text(text)])
    }

    fn replace_children(&mut self, region: &str, nodes: Vec<Node>) -> ViewResult<bool> {
        if !self.contains(region) {
            return Err(ViewError::MissingRegion(region.to_string()));
        }
        self.check_unique_ids(region, &nodes)?;

        let element = self
            .body
            .find_mut(region)
            .ok_or_else(|| ViewError::MissingRegion(region.to_string()))?;
        if element.children == nodes {
            return Ok(false);
        }
        element.children = nodes;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_contains_all_regions() {
        let regions = RegionIds::default();
        let doc = Document::skeleton(&regions);

        for (_, id) in regions.text_regions() {
            assert_eq!(doc.text_of(id).as_deref(), Some(""));
        }
        assert!(doc.contains(&regions.stock_cards));
        assert!(doc.contains(&regions.trade_history));
    }

    #[test]
    fn test_set_text_reports_change() {
        let mut doc = Document::skeleton(&RegionIds::default());

        assert_eq!(doc.set_text("market-status", "Open"), Ok(true));
        assert_eq!(doc.set_text("market-status", "Open"), Ok(false));
        assert_eq!(doc.text_of("market-status").as_deref(), Some("Open"));
    }

    #[test]
    fn test_missing_region() {
        let mut doc = Document::skeleton(&RegionIds::default());
        assert_eq!(
            doc.set_text("nope", "x"),
            Err(ViewError::MissingRegion("nope".to_string()))
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut doc = Document::skeleton(&RegionIds::default());
        let clash = vec![Node::from(Element::new("span").with_id("market-status"))];

        assert_eq!(
            doc.replace_children("stock-cards", clash),
            Err(ViewError::DuplicateId("market-status".to_string()))
        );
    }

    #[test]
    fn test_duplicate_id_within_new_nodes_rejected() {
        let mut doc = Document::skeleton(&RegionIds::default());
        let twice = vec![
            Node::from(Element::new("div").with_id("card-ABC")),
            Node::from(Element::new("div").with_id("card-ABC")),
        ];

        assert_eq!(
            doc.replace_children("stock-cards", twice),
            Err(ViewError::DuplicateId("card-ABC".to_string()))
        );
    }

    #[test]
    fn test_replacing_region_may_reuse_its_own_ids() {
        let mut doc = Document::skeleton(&RegionIds::default());
        let card = || vec![Node::from(Element::new("div").with_id("card-ABC"))];

        assert_eq!(doc.replace_children("stock-cards", card()), Ok(true));
        assert_eq!(doc.replace_children("stock-cards", card()), Ok(false));
    }

    #[test]
    fn test_to_html_wraps_page() {
        let doc = Document::skeleton(&RegionIds::default());
        let html = doc.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<span id=\"market-status\"></span>"));
        assert!(html.ends_with("</body></html>"));
    }
}
