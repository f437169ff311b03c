use anyhow::Result;
use clap::Subcommand;
use std::str::FromStr;
use tracing::info;

use followcheck::profile::ProfileManager;
use followcheck::types::OutputFormat;
use followcheck::webdriver::BrowserType;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Create a persistent profile to log into once
    Create {
        /// Profile name
        name: String,

        /// Browser type (chrome or firefox)
        #[arg(short, long, default_value = "firefox")]
        browser: String,
    },

    /// Delete a profile and its browser data
    Delete {
        /// Profile name
        name: String,
    },

    /// List all profiles
    List {
        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,
    },
}

pub async fn handle_profile(command: ProfileCommands) -> Result<()> {
    let manager = ProfileManager::new()?;

    match command {
        ProfileCommands::Create { name, browser } => {
            info!("Creating profile: {} for {}", name, browser);
            let browser_type = BrowserType::from_str(&browser)?;
            let browser_name = format!("{:?}", browser_type).to_lowercase();

            let path = manager.create_profile(&name, &browser_name)?;
            println!("Profile '{}' created at {}", name, path.display());
            println!(
                "Log in once with: followcheck run <PROFILE_URL> --profile {} --browser {} --no-headless",
                name, browser_name
            );
        }
        ProfileCommands::Delete { name } => {
            manager.delete_profile(&name)?;
            println!("Profile '{}' deleted", name);
        }
        ProfileCommands::List { format } => {
            let profiles = manager.list_profiles()?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&profiles)?);
                }
                OutputFormat::Simple => {
                    if profiles.is_empty() {
                        println!("No profiles found");
                        return Ok(());
                    }
                    println!("{:<20} {:<10} {:<20}", "Name", "Browser", "Last Used");
                    println!("{}", "-".repeat(50));
                    for profile in profiles {
                        println!(
                            "{:<20} {:<10} {:<20}",
                            profile.name,
                            profile.browser,
                            profile.last_used.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
