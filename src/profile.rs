//! Browser profiles that keep the user's login between runs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const METADATA_FILE: &str = "metadata.json";

/// Metadata about a browser profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub name: String,
    /// Browser type (firefox, chrome)
    pub browser: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    /// Throwaway profile for a run without `--profile`
    pub is_temporary: bool,
}

/// Manages browser profiles under `~/.followcheck/profiles`
pub struct ProfileManager {
    profiles_dir: PathBuf,
}

impl ProfileManager {
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Unable to determine home directory")?;
        Self::with_dir(home_dir.join(".followcheck").join("profiles"))
    }

    pub fn with_dir(profiles_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&profiles_dir).context(format!(
            "Failed to create profiles directory {}",
            profiles_dir.display()
        ))?;
        Ok(ProfileManager { profiles_dir })
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty()
            || name.starts_with("tmp-")
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!(
                "Invalid profile name '{}': use letters, digits, '-' or '_' and no 'tmp-' prefix",
                name
            );
        }
        Ok(())
    }

    fn write_metadata(path: &Path, metadata: &ProfileMetadata) -> Result<()> {
        let metadata_json = serde_json::to_string_pretty(metadata)?;
        fs::write(path.join(METADATA_FILE), metadata_json)?;
        Ok(())
    }

    fn read_metadata(path: &Path) -> Result<Option<ProfileMetadata>> {
        let metadata_path = path.join(METADATA_FILE);
        if !metadata_path.exists() {
            return Ok(None);
        }
        let metadata_json = fs::read_to_string(metadata_path)?;
        Ok(Some(serde_json::from_str(&metadata_json)?))
    }

    pub fn create_profile(&self, name: &str, browser: &str) -> Result<PathBuf> {
        Self::validate_name(name)?;
        let profile_path = self.profiles_dir.join(name);

        if profile_path.exists() {
            anyhow::bail!("Profile '{}' already exists", name);
        }

        fs::create_dir_all(&profile_path)?;
        Self::write_metadata(
            &profile_path,
            &ProfileMetadata {
                name: name.to_string(),
                browser: browser.to_string(),
                created_at: Utc::now(),
                last_used: Utc::now(),
                is_temporary: false,
            },
        )?;

        info!("Created profile '{}' for {}", name, browser);
        Ok(profile_path)
    }

    pub fn delete_profile(&self, name: &str) -> Result<()> {
        Self::validate_name(name)?;
        let profile_path = self.profiles_dir.join(name);

        if !profile_path.exists() {
            anyhow::bail!("Profile '{}' does not exist", name);
        }

        fs::remove_dir_all(&profile_path)?;
        info!("Deleted profile '{}'", name);
        Ok(())
    }

    /// Named profiles, most recently used first
    pub fn list_profiles(&self) -> Result<Vec<ProfileMetadata>> {
        let mut profiles = Vec::new();

        for entry in fs::read_dir(&self.profiles_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(metadata) = Self::read_metadata(&path)?
                && !metadata.is_temporary
            {
                profiles.push(metadata);
            }
        }

        profiles.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        Ok(profiles)
    }

    /// Path of an existing profile; bumps its `last_used`
    pub fn get_profile_path(&self, name: &str) -> Result<PathBuf> {
        Self::validate_name(name)?;
        let profile_path = self.profiles_dir.join(name);

        if !profile_path.exists() {
            anyhow::bail!("Profile '{}' does not exist", name);
        }

        if let Some(mut metadata) = Self::read_metadata(&profile_path)? {
            metadata.last_used = Utc::now();
            Self::write_metadata(&profile_path, &metadata)?;
        }

        Ok(profile_path)
    }

    pub fn open_or_create(&self, name: &str, browser: &str) -> Result<PathBuf> {
        if self.profiles_dir.join(name).exists() {
            self.get_profile_path(name)
        } else {
            self.create_profile(name, browser)
        }
    }

    /// Remove temporary profiles last used more than `days` ago
    pub fn cleanup_old_profiles(&self, days: u32) -> Result<usize> {
        let cutoff = Utc::now() - chrono::Duration::days(days as i64);
        let mut deleted = 0;

        for entry in fs::read_dir(&self.profiles_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(metadata) = Self::read_metadata(&path)?
                && metadata.is_temporary
                && metadata.last_used < cutoff
            {
                fs::remove_dir_all(&path)?;
                deleted += 1;
                debug!("Cleaned up old profile: {}", metadata.name);
            }
        }

        Ok(deleted)
    }

    pub fn create_temporary_profile(&self, browser: &str) -> Result<PathBuf> {
        let name = format!("tmp-{}", uuid::Uuid::new_v4());
        let profile_path = self.profiles_dir.join(&name);

        fs::create_dir_all(&profile_path)?;
        Self::write_metadata(
            &profile_path,
            &ProfileMetadata {
                name: name.clone(),
                browser: browser.to_string(),
                created_at: Utc::now(),
                last_used: Utc::now(),
                is_temporary: true,
            },
        )?;

        debug!("Created temporary profile: {}", name);
        Ok(profile_path)
    }
}
