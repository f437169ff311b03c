//! Session log recorded during a run

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Severity of a session log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        })
    }
}

/// How chatty a run is on the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// Progress lines only
    #[default]
    Quiet,
    /// Every session log entry is mirrored to the console
    Verbose,
}

impl LogMode {
    /// The flag string that switches verbose logging on
    pub const VERBOSE_FLAG: &'static str = "--log";

    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(Self::VERBOSE_FLAG) => LogMode::Verbose,
            _ => LogMode::Quiet,
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, LogMode::Verbose)
    }
}

/// A single timestamped line of the session log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall clock time (UTC) as HH:MM:SS
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Append-only log of everything a run did.
///
/// Entries are always recorded; `LogMode::Verbose` additionally mirrors them
/// through `tracing` at the matching level.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
    mode: LogMode,
}

impl SessionLog {
    pub fn new(mode: LogMode) -> Self {
        Self {
            entries: Vec::new(),
            mode,
        }
    }

    pub fn mode(&self) -> LogMode {
        self.mode
    }

    pub fn log(&mut self, message: impl Into<String>, level: LogLevel) {
        let entry = LogEntry {
            timestamp: Utc::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        };

        if self.mode.is_verbose() {
            match level {
                LogLevel::Error => error!("{}", entry),
                LogLevel::Warn => warn!("{}", entry),
                LogLevel::Info => info!("{}", entry),
            }
        }

        self.entries.push(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Info);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Warn);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Error);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, newline separated
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// File name used for exported logs on the given date
    pub fn file_name(date: &str) -> String {
        format!("followcheck-logs-{}.txt", date)
    }

    /// Write the log to `dir`, returning `None` when there is nothing to write
    pub fn download_logs(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if self.entries.is_empty() {
            eprintln!("No logs available. Run with --log to enable detailed logging.");
            return Ok(None);
        }

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let date = Utc::now().format("%Y-%m-%d").to_string();
        let path = dir.join(Self::file_name(&date));
        fs::write(&path, self.render())
            .with_context(|| format!("Failed to write logs to {}", path.display()))?;

        Ok(Some(path))
    }
}

#[cfg(test)]
#[path = "logger_test.rs"]
mod logger_test;
