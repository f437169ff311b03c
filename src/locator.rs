//! Finds the dialog's scroll region and dismisses the dialog.
//!
//! Both are best-effort resolvers over markup this crate does not control.

use anyhow::Result;
use tracing::debug;

use crate::config::{Selectors, Timing};
use crate::logger::SessionLog;
use crate::page::{BoxMetrics, CONTAINER_MARKER, ClickTarget, Page, marked_selector};
use crate::session::pause;

/// How a scroll container was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerSource {
    /// One of the configured fixed selectors matched
    Fixed,
    /// Tallest dialog descendant with vertical overflow
    Overflowing,
    /// Tallest dialog descendant, overflow ignored
    Tallest,
}

/// The region the scroll driver operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollContainer {
    /// Selector addressing the region in later page calls
    pub selector: String,
    pub source: ContainerSource,
}

/// Pick a scroll region among measured dialog descendants.
///
/// Overflowing boxes are preferred over plain ones; within a group the box
/// with the greatest visible height wins, earlier boxes winning ties.
/// Zero-height boxes are never picked.
pub fn choose_container(boxes: &[BoxMetrics]) -> Option<(&BoxMetrics, ContainerSource)> {
    fn tallest<'a>(boxes: impl Iterator<Item = &'a BoxMetrics>) -> Option<&'a BoxMetrics> {
        let mut best: Option<&BoxMetrics> = None;
        for candidate in boxes {
            let current = best.map(|b| b.client_height).unwrap_or(0);
            if candidate.client_height > current {
                best = Some(candidate);
            }
        }
        best
    }

    if let Some(found) = tallest(boxes.iter().filter(|b| b.scrolls_vertically())) {
        return Some((found, ContainerSource::Overflowing));
    }
    tallest(boxes.iter()).map(|found| (found, ContainerSource::Tallest))
}

pub async fn find_scrollable_container<P: Page>(
    page: &P,
    selectors: &Selectors,
    log: &mut SessionLog,
) -> Result<Option<ScrollContainer>> {
    log.info("Searching for scrollable container...");

    for selector in &selectors.container {
        if page.probe(selector).await?.is_some() {
            log.info(format!("Found scrollable container with selector {}", selector));
            return Ok(Some(ScrollContainer {
                selector: selector.clone(),
                source: ContainerSource::Fixed,
            }));
        }
    }

    log.info("No fixed container selector matched, searching the dialog...");

    let Some(boxes) = page.dialog_boxes(&selectors.dialog).await? else {
        log.error("No dialog found!");
        return Ok(None);
    };
    log.info(format!("Found {} divs in dialog", boxes.len()));

    for candidate in boxes.iter().filter(|b| b.scrolls_vertically()) {
        log.info(format!(
            "Potential scrollable div #{}: class={}, height={}, scrollHeight={}",
            candidate.index, candidate.class_name, candidate.client_height, candidate.scroll_height
        ));
    }

    let Some((chosen, source)) = choose_container(&boxes) else {
        log.error("No suitable scrollable container found");
        return Ok(None);
    };

    let description = format!(
        "class={}, height={}",
        chosen.class_name, chosen.client_height
    );
    match source {
        ContainerSource::Tallest => log.warn(format!(
            "No scrollable container found. Using largest div as fallback: {}",
            description
        )),
        _ => log.info(format!("Selected scrollable container: {}", description)),
    }

    if !page
        .mark_dialog_box(&selectors.dialog, chosen.index, CONTAINER_MARKER)
        .await?
    {
        log.error(format!("Container div #{} vanished before it could be used", chosen.index));
        return Ok(None);
    }

    Ok(Some(ScrollContainer {
        selector: marked_selector(CONTAINER_MARKER),
        source,
    }))
}

/// What `close_dialog` tried. Neither variant confirms the dialog is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    Clicked { selector: String },
    EscapeDispatched,
}

pub async fn close_dialog<P: Page>(
    page: &P,
    selectors: &Selectors,
    timing: &Timing,
    log: &mut SessionLog,
) -> Result<CloseOutcome> {
    log.info("Attempting to close dialog...");

    for selector in &selectors.close_button {
        log.info(format!("Trying close button selector: {}", selector));
        let Some(probe) = page.probe(selector).await? else {
            log.info(format!("No close button found with selector: {}", selector));
            continue;
        };

        let target = if probe.is_icon_proxy() {
            ClickTarget::Parent
        } else {
            ClickTarget::Element
        };
        debug!("Close control <{}> clicked via {:?}", probe.tag, target);

        match page.click(selector, target).await {
            Ok(()) => {
                log.info("Successfully clicked close button");
                pause(timing.dialog_close_ms, log).await;
                return Ok(CloseOutcome::Clicked {
                    selector: selector.clone(),
                });
            }
            Err(e) => log.error(format!("Error clicking close button: {}", e)),
        }
    }

    log.info("No close button found, trying Escape key...");
    page.dispatch_escape().await?;
    log.info("Sent Escape key event");
    pause(timing.dialog_close_ms, log).await;
    Ok(CloseOutcome::EscapeDispatched)
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
