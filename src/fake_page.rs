// In-memory page used to exercise selector strategies without a browser

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;

use super::{BoxMetrics, ClickTarget, ElementProbe, Page, ScrollMetrics, marked_selector};
use crate::page::CONTAINER_MARKER;

/// Content of a dialog opened by clicking an element
#[derive(Debug, Clone, Default)]
pub struct FakeDialog {
    pub boxes: Vec<BoxMetrics>,
    pub links: Vec<String>,
    /// Content height after 0, 1, 2, ... scrolls; the last value repeats
    pub heights: Vec<u64>,
}

impl FakeDialog {
    pub fn with_links(links: &[&str]) -> Self {
        FakeDialog {
            boxes: vec![scroll_box(0, "list", 400, 2000)],
            links: links.iter().map(|s| s.to_string()).collect(),
            heights: vec![2000, 3000, 3500],
        }
    }
}

pub fn scroll_box(index: usize, class: &str, client: u64, scroll: u64) -> BoxMetrics {
    BoxMetrics {
        index,
        class_name: class.to_string(),
        overflow_y: "auto".to_string(),
        client_height: client,
        scroll_height: scroll,
    }
}

pub fn plain_box(index: usize, class: &str, client: u64) -> BoxMetrics {
    BoxMetrics {
        index,
        class_name: class.to_string(),
        overflow_y: "visible".to_string(),
        client_height: client,
        scroll_height: client,
    }
}

#[derive(Debug, Clone)]
enum ClickAction {
    Nothing,
    Open(FakeDialog),
    Close,
}

#[derive(Debug, Clone)]
struct FakeElement {
    probe: ElementProbe,
    action: ClickAction,
    in_dialog: bool,
    fails: bool,
}

#[derive(Debug)]
struct OpenDialog {
    content: FakeDialog,
    marked: Option<usize>,
    position: usize,
}

impl OpenDialog {
    fn height(&self) -> u64 {
        match self.content.heights.len() {
            0 => 0,
            n => self.content.heights[self.position.min(n - 1)],
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    dialog: Option<OpenDialog>,
    clicks: Vec<(String, ClickTarget)>,
    escapes: usize,
    scrolls: usize,
}

#[derive(Debug)]
pub struct FakePage {
    url: String,
    elements: HashMap<String, FakeElement>,
    container_selectors: Vec<String>,
    unreadable_links: bool,
    /// Scroll region stops resolving after this many scrolls
    container_lifetime: Option<usize>,
    state: RefCell<FakeState>,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        FakePage {
            url: url.to_string(),
            elements: HashMap::new(),
            container_selectors: Vec::new(),
            unreadable_links: false,
            container_lifetime: None,
            state: RefCell::new(FakeState::default()),
        }
    }

    fn insert(mut self, selector: &str, tag: &str, action: ClickAction, in_dialog: bool) -> Self {
        self.elements.insert(
            selector.to_string(),
            FakeElement {
                probe: ElementProbe {
                    tag: tag.to_string(),
                    text: format!("<{}>", selector),
                    class_name: String::new(),
                },
                action,
                in_dialog,
                fails: false,
            },
        );
        self
    }

    pub fn with_element(self, selector: &str, tag: &str) -> Self {
        self.insert(selector, tag, ClickAction::Nothing, false)
    }

    pub fn with_opener(self, selector: &str, dialog: FakeDialog) -> Self {
        self.insert(selector, "a", ClickAction::Open(dialog), false)
    }

    pub fn with_closer(self, selector: &str, tag: &str) -> Self {
        self.insert(selector, tag, ClickAction::Close, true)
    }

    /// Clicking the element raises an error
    pub fn failing(mut self, selector: &str) -> Self {
        if let Some(element) = self.elements.get_mut(selector) {
            element.fails = true;
        }
        self
    }

    /// Selector that resolves to the open dialog's scroll region
    pub fn with_container_selector(mut self, selector: &str) -> Self {
        self.container_selectors.push(selector.to_string());
        self
    }

    /// Start with a dialog already open
    pub fn with_open_dialog(self, dialog: FakeDialog) -> Self {
        self.state.borrow_mut().dialog = Some(OpenDialog {
            content: dialog,
            marked: None,
            position: 0,
        });
        self
    }

    /// Reading dialog links fails as if the session had died
    pub fn with_unreadable_links(mut self) -> Self {
        self.unreadable_links = true;
        self
    }

    /// Scrolling fails to find the region once `scrolls` scrolls happened
    pub fn with_container_lost_after(mut self, scrolls: usize) -> Self {
        self.container_lifetime = Some(scrolls);
        self
    }

    pub fn clicks(&self) -> Vec<(String, ClickTarget)> {
        self.state.borrow().clicks.clone()
    }

    pub fn escapes(&self) -> usize {
        self.state.borrow().escapes
    }

    pub fn scrolls(&self) -> usize {
        self.state.borrow().scrolls
    }

    pub fn dialog_open(&self) -> bool {
        self.state.borrow().dialog.is_some()
    }

    pub fn marked_box(&self) -> Option<usize> {
        self.state.borrow().dialog.as_ref().and_then(|d| d.marked)
    }

    fn visible(&self, selector: &str) -> Option<&FakeElement> {
        let dialog_open = self.dialog_open();
        self.elements
            .get(selector)
            .filter(|e| !e.in_dialog || dialog_open)
    }

    fn addresses_container(&self, selector: &str, dialog: &OpenDialog) -> bool {
        self.container_selectors.iter().any(|s| s == selector)
            || (dialog.marked.is_some() && selector == marked_selector(CONTAINER_MARKER))
    }

    fn metrics(&self, dialog: &OpenDialog) -> ScrollMetrics {
        let height = dialog.height();
        ScrollMetrics {
            scroll_top: height.saturating_sub(400),
            scroll_height: height,
            client_height: 400,
        }
    }
}

impl Page for FakePage {
    async fn current_url(&self) -> Result<String> {
        Ok(self.url.clone())
    }

    async fn probe(&self, selector: &str) -> Result<Option<ElementProbe>> {
        Ok(self.visible(selector).map(|e| e.probe.clone()))
    }

    async fn click(&self, selector: &str, target: ClickTarget) -> Result<()> {
        let element = self
            .visible(selector)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Element not found: {}", selector))?;
        if element.fails {
            anyhow::bail!("element click intercepted: {}", selector);
        }

        let mut state = self.state.borrow_mut();
        state.clicks.push((selector.to_string(), target));
        match element.action {
            ClickAction::Nothing => {}
            ClickAction::Open(content) => {
                state.dialog = Some(OpenDialog {
                    content,
                    marked: None,
                    position: 0,
                });
            }
            ClickAction::Close => state.dialog = None,
        }
        Ok(())
    }

    async fn dialog_boxes(&self, _dialog: &str) -> Result<Option<Vec<BoxMetrics>>> {
        Ok(self
            .state
            .borrow()
            .dialog
            .as_ref()
            .map(|d| d.content.boxes.clone()))
    }

    async fn mark_dialog_box(&self, _dialog: &str, index: usize, _marker: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        match state.dialog.as_mut() {
            Some(dialog) if dialog.content.boxes.iter().any(|b| b.index == index) => {
                dialog.marked = Some(index);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn scroll_metrics(&self, selector: &str) -> Result<Option<ScrollMetrics>> {
        let state = self.state.borrow();
        Ok(state
            .dialog
            .as_ref()
            .filter(|d| self.addresses_container(selector, d))
            .map(|d| self.metrics(d)))
    }

    async fn scroll_to_end(&self, selector: &str) -> Result<Option<ScrollMetrics>> {
        let mut state = self.state.borrow_mut();
        if self
            .container_lifetime
            .is_some_and(|lifetime| state.scrolls >= lifetime)
        {
            return Ok(None);
        }
        let Some(dialog) = state.dialog.as_mut() else {
            return Ok(None);
        };
        if !self.addresses_container(selector, dialog) {
            return Ok(None);
        }
        dialog.position += 1;
        let metrics = self.metrics(dialog);
        state.scrolls += 1;
        Ok(Some(metrics))
    }

    async fn link_targets(&self, _dialog: &str, _anchors: &str) -> Result<Option<Vec<String>>> {
        if self.unreadable_links {
            anyhow::bail!("invalid session id");
        }
        Ok(self
            .state
            .borrow()
            .dialog
            .as_ref()
            .map(|d| d.content.links.clone()))
    }

    async fn dispatch_escape(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.escapes += 1;
        state.dialog = None;
        Ok(())
    }
}
