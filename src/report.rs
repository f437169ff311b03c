//! Console tables, JSON and the downloadable text report.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compare::Comparison;

/// Everything a finished comparison reports
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub site: &'a str,
    pub date: String,
    pub followers_count: usize,
    pub following_count: usize,
    pub not_following_back: &'a [String],
    pub not_followed_back: &'a [String],
}

impl<'a> Report<'a> {
    pub fn new(
        site: &'a str,
        date: String,
        followers: &[String],
        following: &[String],
        comparison: &'a Comparison,
    ) -> Self {
        Report {
            site,
            date,
            followers_count: followers.len(),
            following_count: following.len(),
            not_following_back: &comparison.not_following_back,
            not_followed_back: &comparison.not_followed_back,
        }
    }

    pub fn file_name(&self) -> String {
        format!("followcheck-results-{}.txt", self.date)
    }

    /// Plain-text report with one `@handle` per line
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            format!("{} Follow Checker Results - {}", self.site, self.date),
            String::new(),
            format!("Total followers found: {}", self.followers_count),
            format!("Total following found: {}", self.following_count),
            String::new(),
            format!(
                "=== Users who DON'T follow you back ({}) ===",
                self.not_following_back.len()
            ),
        ];
        lines.extend(self.not_following_back.iter().map(|h| format!("@{}", h)));
        lines.push(String::new());
        lines.push(format!(
            "=== Users you DON'T follow back ({}) ===",
            self.not_followed_back.len()
        ));
        lines.extend(self.not_followed_back.iter().map(|h| format!("@{}", h)));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Human-readable console output
    pub fn render_console(&self) -> String {
        let mut out = format!("=== {} Follow Checker Results ===\n", self.site);
        out.push_str(&format!("Total followers found: {}\n", self.followers_count));
        out.push_str(&format!("Total following found: {}\n\n", self.following_count));

        out.push_str("Users who DON'T follow you back:\n");
        out.push_str(&render_table(self.not_following_back));
        out.push_str(&format!(
            "Total: {} users don't follow you back\n\n",
            self.not_following_back.len()
        ));

        out.push_str("Users you DON'T follow back:\n");
        out.push_str(&render_table(self.not_followed_back));
        out.push_str(&format!(
            "Total: {} users you don't follow back\n",
            self.not_followed_back.len()
        ));
        out
    }

    pub fn write_text(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.render_text())
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        Ok(path)
    }
}

/// Two-column table (`#`, `username`) in the shape of a console table
pub fn render_table(handles: &[String]) -> String {
    let index_width = handles.len().saturating_sub(1).to_string().len().max(1);
    let name_width = handles
        .iter()
        .map(|h| h.chars().count())
        .max()
        .unwrap_or(0)
        .max("username".len());

    let border = format!(
        "+{}+{}+\n",
        "-".repeat(index_width + 2),
        "-".repeat(name_width + 2)
    );

    let row = |index: &str, name: &str| {
        format!(
            "| {:>iw$} | {:<nw$} |\n",
            index,
            name,
            iw = index_width,
            nw = name_width
        )
    };

    let mut out = border.clone();
    out.push_str(&row("#", "username"));
    out.push_str(&border);
    for (i, handle) in handles.iter().enumerate() {
        out.push_str(&row(&i.to_string(), handle));
    }
    if !handles.is_empty() {
        out.push_str(&border);
    }
    out
}

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;
