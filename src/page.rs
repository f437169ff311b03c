//! DOM capabilities the follow check needs from a live page.
//!
//! `webdriver::Browser` implements this over WebDriver. Everything that picks
//! elements (locator, scroll driver, extractor, click dispatcher) is written
//! against the trait so it can run against synthetic fixtures.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Attribute placed on a heuristically chosen scroll container
pub const CONTAINER_MARKER: &str = "data-followcheck-container";

/// First element matching a selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementProbe {
    /// Lowercase tag name
    pub tag: String,
    pub text: String,
    pub class_name: String,
}

impl ElementProbe {
    /// Icons stand in for buttons on the target site and do not take clicks
    pub fn is_icon_proxy(&self) -> bool {
        matches!(self.tag.as_str(), "svg" | "path" | "img")
    }
}

/// Whether a click lands on the matched element or on its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Element,
    Parent,
}

/// Measurements of one `div` inside the dialog, in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxMetrics {
    /// Position among the dialog's `div` descendants
    pub index: usize,
    pub class_name: String,
    /// Computed `overflow-y`
    pub overflow_y: String,
    pub client_height: u64,
    pub scroll_height: u64,
}

impl BoxMetrics {
    pub fn scrolls_vertically(&self) -> bool {
        matches!(self.overflow_y.as_str(), "auto" | "scroll")
            && self.scroll_height > self.client_height
    }
}

/// Scroll state of a container after a read or a scroll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: u64,
    pub scroll_height: u64,
    pub client_height: u64,
}

#[allow(async_fn_in_trait)]
pub trait Page {
    /// Location of the current document
    async fn current_url(&self) -> Result<String>;

    /// Describe the first element matching `selector`, if any
    async fn probe(&self, selector: &str) -> Result<Option<ElementProbe>>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str, target: ClickTarget) -> Result<()>;

    /// Measure every `div` inside the first `dialog` match; `None` if no dialog
    async fn dialog_boxes(&self, dialog: &str) -> Result<Option<Vec<BoxMetrics>>>;

    /// Put `marker` on the `index`-th `div` of the dialog. False if it is gone.
    async fn mark_dialog_box(&self, dialog: &str, index: usize, marker: &str) -> Result<bool>;

    /// Read scroll state of the first `selector` match
    async fn scroll_metrics(&self, selector: &str) -> Result<Option<ScrollMetrics>>;

    /// Set the scroll offset of the first `selector` match to its maximum
    async fn scroll_to_end(&self, selector: &str) -> Result<Option<ScrollMetrics>>;

    /// Resolved `href` of every `anchors` match inside the dialog; `None` if no dialog
    async fn link_targets(&self, dialog: &str, anchors: &str) -> Result<Option<Vec<String>>>;

    /// Fire a synthetic Escape keydown at the document. There is no acknowledgment.
    async fn dispatch_escape(&self) -> Result<()>;
}

/// Selector addressing the `div` that `mark_dialog_box` tagged
pub fn marked_selector(marker: &str) -> String {
    format!("[{}]", marker)
}

#[cfg(test)]
#[path = "fake_page.rs"]
pub(crate) mod fake_page;
