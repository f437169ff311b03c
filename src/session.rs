//! The follow check run: collect both lists, compare them, hand back a session.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::click::click_link;
use crate::compare::{Comparison, compare};
use crate::config::Settings;
use crate::errors::FollowCheckError;
use crate::extract::get_usernames_from_dialog;
use crate::locator::close_dialog;
use crate::logger::{LogMode, SessionLog};
use crate::page::Page;
use crate::report::Report;
use crate::scroll::scroll_dialog;
use crate::types::ListKind;

/// Sleep for `ms`, recording the wait in the session log
pub async fn pause(ms: u64, log: &mut SessionLog) {
    log.info(format!("Waiting for {}ms...", ms));
    tokio::time::sleep(Duration::from_millis(ms)).await;
    log.info(format!("Finished waiting for {}ms", ms));
}

/// True when `url`'s host is `domain` or a subdomain of it
pub fn host_matches(url: &str, domain: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Both lists came back empty
    NothingRetrieved,
    /// A step failed; the reason is also in the log
    Aborted { reason: String },
}

/// Result of one run. Holds the lists and the log, and writes the exports.
#[derive(Debug)]
pub struct FollowSession {
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub comparison: Option<Comparison>,
    pub status: RunStatus,
    site: String,
    log: SessionLog,
}

impl FollowSession {
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn report(&self) -> Option<Report<'_>> {
        let comparison = self.comparison.as_ref()?;
        Some(Report::new(
            &self.site,
            Utc::now().format("%Y-%m-%d").to_string(),
            &self.followers,
            &self.following,
            comparison,
        ))
    }

    /// Write the results report into `dir`
    pub fn download_results(&self, dir: &Path) -> Result<PathBuf> {
        let report = self
            .report()
            .context("No comparison results available to download")?;
        report.write_text(dir)
    }

    pub fn download_logs(&self, dir: &Path) -> Result<Option<PathBuf>> {
        self.log.download_logs(dir)
    }

    /// Map the run status onto the CLI error type
    pub fn into_result(self) -> std::result::Result<Self, FollowCheckError> {
        match &self.status {
            RunStatus::Completed => Ok(self),
            RunStatus::NothingRetrieved => Err(FollowCheckError::NothingRetrieved),
            RunStatus::Aborted { reason } => Err(FollowCheckError::Aborted(reason.clone())),
        }
    }
}

/// Drives one follow check against a page
pub struct FollowChecker<'a, P: Page> {
    page: &'a P,
    settings: &'a Settings,
    log: SessionLog,
}

impl<'a, P: Page> FollowChecker<'a, P> {
    pub fn new(page: &'a P, settings: &'a Settings, mode: LogMode) -> Self {
        Self {
            page,
            settings,
            log: SessionLog::new(mode),
        }
    }

    /// Run the whole sequence.
    ///
    /// Only a wrong host is returned as an error. Every later failure ends up
    /// in the returned session's status and log.
    pub async fn run(mut self) -> Result<FollowSession> {
        let current = self.page.current_url().await?;
        let host = &self.settings.site.host;
        if !host_matches(&current, host) {
            eprintln!("Please run followcheck on the {} website.", host);
            return Err(FollowCheckError::WrongHost {
                expected: host.clone(),
                actual: current,
            }
            .into());
        }

        let verbose = self.log.mode().is_verbose();
        if verbose {
            eprintln!("{} Follow Checker starting with logging enabled...", self.settings.site.name);
        } else {
            eprintln!("{} Follow Checker starting...", self.settings.site.name);
        }
        self.log.info("Script initialized");

        let mut followers = Vec::new();
        let mut following = Vec::new();
        let outcome = self.compare_lists(&mut followers, &mut following).await;

        let (comparison, status) = match outcome {
            Ok(Some(comparison)) => {
                self.log.info("Run completed successfully");
                if verbose {
                    eprintln!("Run completed successfully");
                }
                (Some(comparison), RunStatus::Completed)
            }
            Ok(None) => (None, RunStatus::NothingRetrieved),
            Err(err) => {
                self.log.error(format!("An error occurred: {}", err));
                self.log.error(format!("Cause chain: {:?}", err));
                eprintln!("An error occurred: {}", err);
                eprintln!("Please make sure you're on your profile page and try again.");
                if verbose {
                    eprintln!("Save the logs with --save-logs for troubleshooting.");
                }
                (
                    None,
                    RunStatus::Aborted {
                        reason: err.to_string(),
                    },
                )
            }
        };

        Ok(FollowSession {
            followers,
            following,
            comparison,
            status,
            site: self.settings.site.name.clone(),
            log: self.log,
        })
    }

    async fn compare_lists(
        &mut self,
        followers: &mut Vec<String>,
        following: &mut Vec<String>,
    ) -> Result<Option<Comparison>> {
        self.log.info("Getting followers...");
        *followers = self.collect(ListKind::Followers).await?;
        self.log.info(format!(
            "Followers retrieval complete. Found {} followers",
            followers.len()
        ));

        pause(self.settings.timing.between_lists_ms, &mut self.log).await;

        self.log.info("Getting following...");
        *following = self.collect(ListKind::Following).await?;
        self.log.info(format!(
            "Following retrieval complete. Found {} following",
            following.len()
        ));

        if followers.is_empty() && following.is_empty() {
            self.log.error("Could not retrieve any followers or following");
            eprintln!("Could not retrieve any followers or following");
            return Ok(None);
        }

        let comparison = compare(followers, following, self.settings.site.order);
        self.log.info(format!(
            "Found {} users who don't follow you back",
            comparison.not_following_back.len()
        ));
        self.log.info(format!(
            "Found {} users you don't follow back",
            comparison.not_followed_back.len()
        ));
        Ok(Some(comparison))
    }

    /// Open one dialog, load it fully, read it and close it
    async fn collect(&mut self, kind: ListKind) -> Result<Vec<String>> {
        let page = self.page;
        let settings = self.settings;
        let log = &mut self.log;

        log.info(format!("Collecting {}...", kind));
        eprintln!("Getting {}...", kind);

        if !click_link(page, kind, &settings.selectors, log).await? {
            log.error(format!("Failed to click {} link", kind));
            return Ok(Vec::new());
        }

        log.info(format!("Waiting for {} dialog to open...", kind));
        pause(settings.timing.dialog_open_ms, log).await;

        log.info(format!("Scrolling through {} list...", kind));
        if let Some(outcome) = scroll_dialog(page, settings, log).await? {
            log.info(format!(
                "Scrolled {} times (converged: {})",
                outcome.attempts, outcome.converged
            ));
        }

        let handles = get_usernames_from_dialog(page, &settings.selectors, log).await?;
        log.info(format!("Found {} {}", handles.len(), kind));
        eprintln!("Found {} {}", handles.len(), kind);

        log.info(format!("Closing {} dialog...", kind));
        close_dialog(page, &settings.selectors, &settings.timing, log).await?;

        Ok(handles.into_vec())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
