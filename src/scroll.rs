//! Scrolls a dialog list until its content stops growing.

use anyhow::Result;
use rand::Rng;

use crate::config::Settings;
use crate::locator::find_scrollable_container;
use crate::logger::SessionLog;
use crate::page::Page;
use crate::session::pause;

/// Where a scroll run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollOutcome {
    pub attempts: u32,
    /// Height stayed constant for the configured number of samples
    pub converged: bool,
    pub final_height: u64,
}

/// Wait before sampling height again: `base` plus up to `jitter` ms
pub fn scroll_delay_ms(base: u64, jitter: u64) -> u64 {
    if jitter == 0 {
        return base;
    }
    base.saturating_add(rand::thread_rng().gen_range(0..=jitter))
}

/// Returns `None` when no container could be located.
pub async fn scroll_dialog<P: Page>(
    page: &P,
    settings: &Settings,
    log: &mut SessionLog,
) -> Result<Option<ScrollOutcome>> {
    log.info("Starting scroll of dialog...");
    let timing = &settings.timing;

    let Some(container) = find_scrollable_container(page, &settings.selectors, log).await? else {
        log.error("Failed to find scrollable container");
        return Ok(None);
    };

    let Some(initial) = page.scroll_metrics(&container.selector).await? else {
        log.error(format!("Container {} is not readable", container.selector));
        return Ok(None);
    };
    log.info(format!(
        "Found scrollable section {}: height={}, scrollHeight={}",
        container.selector, initial.client_height, initial.scroll_height
    ));

    let max = timing.max_attempts;
    let mut last_height = initial.scroll_height;
    let mut attempts = 0;
    let mut unchanged = 0;
    let mut converged = false;

    while attempts < max {
        attempts += 1;
        log.info(format!("Scroll attempt {}/{}", attempts, max));

        let Some(scrolled) = page.scroll_to_end(&container.selector).await? else {
            log.error("Scroll container disappeared, stopping");
            break;
        };
        log.info(format!("Scrolled to position: {}", scrolled.scroll_top));

        pause(scroll_delay_ms(timing.scroll_base_ms, timing.scroll_jitter_ms), log).await;

        let Some(sample) = page.scroll_metrics(&container.selector).await? else {
            log.error("Scroll container disappeared, stopping");
            break;
        };
        let new_height = sample.scroll_height;
        log.info(format!(
            "New scroll height: {}, previous: {}",
            new_height, last_height
        ));

        if new_height == last_height {
            unchanged += 1;
            log.info(format!(
                "No change in height detected ({}/{})",
                unchanged, timing.stable_threshold
            ));
            if unchanged >= timing.stable_threshold {
                log.info(format!(
                    "Finished scrolling, no changes detected after {} attempts",
                    unchanged
                ));
                converged = true;
                break;
            }
        } else {
            unchanged = 0;
            last_height = new_height;
            log.info("Height changed, reset no-change counter");
        }

        if attempts >= max {
            log.warn("Reached maximum scroll attempts");
        }

        if !log.mode().is_verbose()
            && timing.progress_every > 0
            && attempts % timing.progress_every == 0
        {
            eprintln!("Scrolling... ({}/{})", attempts, max);
        }
    }

    log.info(format!("Scrolling completed. Final height: {}", last_height));
    Ok(Some(ScrollOutcome {
        attempts,
        converged,
        final_height: last_height,
    }))
}

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;
