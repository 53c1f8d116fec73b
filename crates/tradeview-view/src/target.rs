//! Render target abstraction.

use crate::error::ViewResult;
use crate::node::Node;

/// Something the view handlers can write into.
///
/// Regions are addressed by id. Both write operations return `Ok(true)`
/// when the region content changed and `Ok(false)` when it was already
/// identical. Writing to an unknown region yields
/// [`ViewError::MissingRegion`](crate::ViewError::MissingRegion).
#[cfg_attr(test, mockall::automock)]
pub trait RenderTarget {
    /// Whether a region with this id exists.
    fn contains(&self, region: &str) -> bool;

    /// Replace the region's content with a single text node.
    fn set_text(&mut self, region: &str, text: &str) -> ViewResult<bool>;

    /// Replace the region's children.
    fn replace_children(&mut self, region: &str, nodes: Vec<Node>) -> ViewResult<bool>;
}
