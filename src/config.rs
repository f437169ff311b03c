//! Run settings: timing presets, selector strategies and site parameters.
//!
//! Defaults are built in. A TOML file may override any subset of fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::{ListKind, ResultOrder};

/// Named timing profiles for the scroll driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 800ms +/- 400ms per scroll, 5 unchanged samples to stop, 300 scrolls max
    Classic,
    /// 700ms +/- 300ms per scroll, 4 unchanged samples to stop, 200 scrolls max
    Brisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Fixed part of the wait after each scroll
    pub scroll_base_ms: u64,
    /// Upper bound of the random part added to `scroll_base_ms`
    pub scroll_jitter_ms: u64,
    /// Consecutive unchanged height samples that end scrolling
    pub stable_threshold: u32,
    pub max_attempts: u32,
    /// Quiet-mode progress line interval, in scroll attempts
    pub progress_every: u32,
    pub dialog_open_ms: u64,
    pub dialog_close_ms: u64,
    pub between_lists_ms: u64,
}

impl Timing {
    pub fn preset(preset: Preset) -> Self {
        let base = Timing {
            scroll_base_ms: 800,
            scroll_jitter_ms: 400,
            stable_threshold: 5,
            max_attempts: 300,
            progress_every: 20,
            dialog_open_ms: 3000,
            dialog_close_ms: 1500,
            between_lists_ms: 2000,
        };
        match preset {
            Preset::Classic => base,
            Preset::Brisk => Timing {
                scroll_base_ms: 700,
                scroll_jitter_ms: 300,
                stable_threshold: 4,
                max_attempts: 200,
                ..base
            },
        }
    }

    /// Take the scroll pacing of `preset`, keep the dialog waits
    pub fn apply_preset(&mut self, preset: Preset) {
        let pacing = Timing::preset(preset);
        self.scroll_base_ms = pacing.scroll_base_ms;
        self.scroll_jitter_ms = pacing.scroll_jitter_ms;
        self.stable_threshold = pacing.stable_threshold;
        self.max_attempts = pacing.max_attempts;
    }

    /// No waiting at all; used for fixtures
    pub fn immediate() -> Self {
        Timing {
            scroll_base_ms: 0,
            scroll_jitter_ms: 0,
            dialog_open_ms: 0,
            dialog_close_ms: 0,
            between_lists_ms: 0,
            ..Timing::preset(Preset::Classic)
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing::preset(Preset::Classic)
    }
}

/// Ordered detection strategies. Earlier entries win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub dialog: String,
    /// Fixed selectors tried before the overflow heuristic
    pub container: Vec<String>,
    pub profile_links: String,
    pub followers_link: Vec<String>,
    pub following_link: Vec<String>,
    pub close_button: Vec<String>,
    /// Links whose target contains any of these are not profiles
    pub denied_paths: Vec<String>,
    /// Handles produced by site chrome rather than accounts
    pub sentinel_handles: Vec<String>,
}

impl Selectors {
    pub fn link_selectors(&self, kind: ListKind) -> &[String] {
        match kind {
            ListKind::Followers => &self.followers_link,
            ListKind::Following => &self.following_link,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            dialog: r#"div[role="dialog"]"#.to_string(),
            container: strings(&["div._aano"]),
            profile_links: r#"a[role="link"]"#.to_string(),
            followers_link: strings(&[
                r#"a[href$="/followers/"]"#,
                r#"a[href*="/followers"]"#,
                "ul li:nth-child(2) a",
            ]),
            following_link: strings(&[
                r#"a[href$="/following/"]"#,
                r#"a[href*="/following"]"#,
                "ul li:nth-child(3) a",
            ]),
            close_button: strings(&[
                r#"div[role="dialog"] button[type="button"]"#,
                r#"div[role="dialog"] svg[aria-label="Close"]"#,
                r#"div[role="presentation"] button"#,
                r#"div[role="dialog"] button"#,
            ]),
            denied_paths: strings(&["/p/", "/reel/", "/reels/", "/stories/", "/explore/"]),
            sentinel_handles: strings(&["accounts"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    /// Registrable domain the current page must belong to
    pub host: String,
    /// Title used in reports
    pub name: String,
    pub order: ResultOrder,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            host: "instagram.com".to_string(),
            name: "Instagram".to_string(),
            order: ResultOrder::Extraction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: Timing,
    pub selectors: Selectors,
    pub site: Site,
}

impl Settings {
    /// Default location: `<config_dir>/followcheck/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("followcheck").join("config.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).context("Invalid settings file")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Explicit path must exist; otherwise the default path is used if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading settings from {}", path.display());
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("Loading settings from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Settings::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }

    pub fn validate(&self) -> Result<()> {
        if self.timing.stable_threshold == 0 {
            anyhow::bail!("timing.stable_threshold must be at least 1");
        }
        if self.timing.max_attempts == 0 {
            anyhow::bail!("timing.max_attempts must be at least 1");
        }
        if self.site.host.trim().is_empty() {
            anyhow::bail!("site.host must not be empty");
        }
        if self.selectors.dialog.trim().is_empty() {
            anyhow::bail!("selectors.dialog must not be empty");
        }
        if self.selectors.profile_links.trim().is_empty() {
            anyhow::bail!("selectors.profile_links must not be empty");
        }
        for (name, list) in [
            ("selectors.followers_link", &self.selectors.followers_link),
            ("selectors.following_link", &self.selectors.following_link),
        ] {
            if list.is_empty() {
                anyhow::bail!("{} must contain at least one selector", name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
