#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use followcheck::errors::FollowCheckError;
use followcheck::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;

mod commands;

use crate::commands::config::ConfigCommands;
use crate::commands::profile::ProfileCommands;
use crate::commands::run::RunArgs;

const EXIT_SUCCESS: i32 = 0;

#[derive(Parser)]
#[command(name = "followcheck")]
#[command(about = "Find out who doesn't follow you back on Instagram", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the followers and following lists of a profile
    Run(RunArgs),

    /// Manage persistent browser profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn verbose(&self) -> bool {
        matches!(&self.command, Commands::Run(args) if args.log)
    }
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Always clean up WebDriver processes before exiting
    GLOBAL_WEBDRIVER_MANAGER.stop_all();

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            let followcheck_err: FollowCheckError = err.into();

            // JSON on stdout for scripts
            let error_json = json!({
                "error": true,
                "message": followcheck_err.to_string(),
                "exit_code": followcheck_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            eprintln!("Error: {}", followcheck_err);
            std::process::exit(followcheck_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose() {
        "followcheck=debug"
    } else {
        "followcheck=info"
    };

    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::handle_run(args).await?,
        Commands::Profile { command } => commands::profile::handle_profile(command).await?,
        Commands::Config { command } => commands::config::handle_config(command).await?,
        Commands::Version => commands::version::handle_version().await?,
    }

    Ok(())
}
