use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::PathBuf;

use followcheck::config::Settings;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings as TOML
    Show {
        /// Settings file to read instead of the default one
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default settings file location
    Path,

    /// Write the built-in defaults to the settings file
    Init {
        /// Target file (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn default_path() -> Result<PathBuf> {
    Settings::default_path().context("Unable to determine config directory")
}

pub async fn handle_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { config } => {
            let settings = Settings::load(config.as_deref())?;
            print!("{}", settings.to_toml_string()?);
        }
        ConfigCommands::Path => {
            println!("{}", default_path()?.display());
        }
        ConfigCommands::Init { config, force } => {
            let path = match config {
                Some(path) => path,
                None => default_path()?,
            };
            if path.exists() && !force {
                anyhow::bail!(
                    "Settings file {} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, Settings::default().to_toml_string()?)
                .context(format!("Failed to write {}", path.display()))?;
            println!("Wrote default settings to {}", path.display());
        }
    }
    Ok(())
}
