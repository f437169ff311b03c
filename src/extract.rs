//! Turns the dialog's profile links into account handles.

use anyhow::Result;
use regex::Regex;

use crate::config::Selectors;
use crate::logger::SessionLog;
use crate::page::Page;
use crate::types::HandleList;

lazy_static::lazy_static! {
    // First path segment after an optional scheme://host prefix
    static ref FIRST_SEGMENT: Regex =
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.-]*://[^/]+)?/([^/?#]+)").expect("valid regex");
}

/// Extract the account handle from a profile link.
///
/// `https://www.instagram.com/alice/` and `https://www.instagram.com/alice`
/// both yield `alice`. Targets that do not start with a path fall back to
/// their last non-empty `/`-separated segment.
pub fn username_from_url(url: &str) -> Option<String> {
    if let Some(caps) = FIRST_SEGMENT.captures(url) {
        return Some(caps[1].to_string());
    }

    let rest = match url.split_once("://") {
        Some((_, after_scheme)) => after_scheme.split_once('/').map(|(_, p)| p).unwrap_or(""),
        None => url,
    };
    let path = rest.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// True when the link points at a post, reel, story or explore page
pub fn is_denied_link(url: &str, denied_paths: &[String]) -> bool {
    denied_paths.iter().any(|segment| url.contains(segment.as_str()))
}

/// Keep profile links, map them to handles and drop repeats
pub fn handles_from_links<'a>(
    links: impl IntoIterator<Item = &'a str>,
    selectors: &Selectors,
    log: &mut SessionLog,
) -> HandleList {
    let mut handles = HandleList::new();

    for (index, link) in links.into_iter().enumerate() {
        if !link.contains('/') || is_denied_link(link, &selectors.denied_paths) {
            continue;
        }

        let Some(handle) = username_from_url(link) else {
            log.warn(format!("Could not parse handle from link #{}: {}", index, link));
            continue;
        };
        log.info(format!(
            "Processing link #{}: href={}, extracted username={}",
            index, link, handle
        ));

        if selectors.sentinel_handles.contains(&handle) {
            continue;
        }
        if handles.insert(handle.as_str()) {
            log.info(format!("Added username: {}", handle));
        }
    }

    handles
}

pub async fn get_usernames_from_dialog<P: Page>(
    page: &P,
    selectors: &Selectors,
    log: &mut SessionLog,
) -> Result<HandleList> {
    log.info("Getting usernames from dialog...");

    let Some(links) = page
        .link_targets(&selectors.dialog, &selectors.profile_links)
        .await?
    else {
        log.error("No dialog found for username extraction");
        return Ok(HandleList::new());
    };
    log.info(format!("Found {} user links in dialog", links.len()));

    let handles = handles_from_links(links.iter().map(String::as_str), selectors, log);
    log.info(format!("Total unique usernames found: {}", handles.len()));
    Ok(handles)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;
