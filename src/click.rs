use anyhow::Result;

use crate::config::Selectors;
use crate::logger::SessionLog;
use crate::page::{ClickTarget, Page};
use crate::types::ListKind;

/// Open the followers or following dialog.
///
/// Returns false only when no selector in the list produced a clickable element.
pub async fn click_link<P: Page>(
    page: &P,
    kind: ListKind,
    selectors: &Selectors,
    log: &mut SessionLog,
) -> Result<bool> {
    log.info(format!("Attempting to click {} link...", kind));

    for selector in selectors.link_selectors(kind) {
        log.info(format!("Trying selector: {}", selector));
        let Some(probe) = page.probe(selector).await? else {
            log.info(format!("No element found with selector: {}", selector));
            continue;
        };

        log.info(format!("Found {} link with selector: {}", kind, selector));
        log.info(format!("Link text: {}", probe.text));

        match page.click(selector, ClickTarget::Element).await {
            Ok(()) => {
                log.info(format!("Successfully clicked {} link", kind));
                return Ok(true);
            }
            Err(e) => log.error(format!("Error clicking {} link: {}", kind, e)),
        }
    }

    log.error(format!("Could not find or click {} link", kind));
    Ok(false)
}
