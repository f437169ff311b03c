//! # followcheck
#![allow(clippy::uninlined_format_args)]
//!
//! CLI tool that reads the followers and following lists of an Instagram
//! profile through a WebDriver-controlled browser and reports who does not
//! follow back.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Log in once with a visible browser and a persistent profile
//! followcheck profile create insta --browser firefox
//! followcheck run "https://www.instagram.com/me/" --profile insta --no-headless
//!
//! # Later runs reuse the session
//! followcheck run "https://www.instagram.com/me/" --profile insta --save-results
//!
//! # Verbose session log, written next to the results
//! followcheck run "https://www.instagram.com/me/" --profile insta --log --save-logs
//!
//! # Machine readable output
//! followcheck run "https://www.instagram.com/me/" --profile insta --format json | jq '.not_following_back'
//! ```
//!
//! ### Configuration
//!
//! ```bash
//! # Print the effective settings as TOML
//! followcheck config show
//!
//! # Write the defaults to the config file for editing
//! followcheck config init
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use followcheck::{Browser, BrowserType, FollowChecker, LogMode, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let browser = Browser::new(BrowserType::Firefox, Some("insta".into()), None, false).await?;
//! browser.goto("https://www.instagram.com/me/").await?;
//!
//! let settings = Settings::default();
//! let session = FollowChecker::new(&browser, &settings, LogMode::Quiet).run().await?;
//! if let Some(comparison) = &session.comparison {
//!     println!("{:?}", comparison.not_following_back);
//! }
//! browser.close().await?;
//! # Ok(())
//! # }
//! ```

/// Opening the followers/following dialogs
pub mod click;

/// Set differences between the two lists
pub mod compare;

/// Timing, selector and site settings
pub mod config;

pub mod errors;

/// Handle extraction from dialog links
pub mod extract;

/// Scroll container discovery and dialog closing
pub mod locator;

/// Per-run session log
pub mod logger;

/// DOM capabilities needed from a live page
pub mod page;

/// Profile management for browser sessions
pub mod profile;

/// Results report rendering and export
pub mod report;

/// Dialog scrolling until the list stops growing
pub mod scroll;

/// The end-to-end follow check
pub mod session;

pub mod types;

/// WebDriver browser control
pub mod webdriver;

/// Automatic WebDriver process management
pub mod webdriver_manager;

pub use compare::{Comparison, compare};
pub use config::{Preset, Settings};
pub use errors::FollowCheckError;
pub use logger::{LogLevel, LogMode, SessionLog};
pub use page::Page;
pub use profile::ProfileManager;
pub use report::Report;
pub use session::{FollowChecker, FollowSession, RunStatus};
pub use types::{ListKind, OutputFormat, ResultOrder, ViewportSize};
pub use webdriver::{Browser, BrowserType};
