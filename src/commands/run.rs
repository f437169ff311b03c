use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use followcheck::config::{Preset, Settings};
use followcheck::logger::LogMode;
use followcheck::session::{FollowChecker, FollowSession};
use followcheck::types::{OutputFormat, ResultOrder, ViewportSize};
use followcheck::webdriver::{Browser, BrowserType};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Profile page to check, e.g. https://www.instagram.com/<you>/
    pub url: String,

    /// Record a verbose session log and mirror it to stderr
    #[arg(long)]
    pub log: bool,

    /// Browser to drive (firefox or chrome)
    #[arg(short, long, default_value = "firefox")]
    pub browser: String,

    /// Persistent browser profile holding the logged-in session
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub no_headless: bool,

    /// Viewport size (e.g., "1280x900")
    #[arg(long)]
    pub viewport: Option<String>,

    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scroll pacing preset
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Order of handles in the results
    #[arg(long, value_enum)]
    pub order: Option<ResultOrder>,

    /// Output format
    #[arg(short, long, default_value = "simple")]
    pub format: OutputFormat,

    /// Write the results report to the output directory
    #[arg(long)]
    pub save_results: bool,

    /// Write the session log to the output directory
    #[arg(long)]
    pub save_logs: bool,

    /// Directory for saved results and logs
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl RunArgs {
    pub fn log_mode(&self) -> LogMode {
        LogMode::from_flag(self.log.then_some(LogMode::VERBOSE_FLAG))
    }

    /// Settings file plus command line overrides
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(preset) = self.preset {
            settings.timing.apply_preset(preset);
        }
        if let Some(order) = self.order {
            settings.site.order = order;
        }
        settings.validate()?;
        Ok(settings)
    }
}

pub async fn handle_run(args: RunArgs) -> Result<()> {
    let settings = args.settings()?;
    let browser_type = BrowserType::from_str(&args.browser)?;
    let viewport = args
        .viewport
        .as_deref()
        .map(ViewportSize::parse)
        .transpose()?;

    let browser = Browser::new(
        browser_type,
        args.profile.clone(),
        viewport,
        !args.no_headless,
    )
    .await?;

    let outcome = check(&browser, &settings, &args).await;

    // Close even when the check failed
    if let Err(e) = browser.close().await {
        debug!("Failed to close browser: {}", e);
    }

    outcome
}

async fn check(browser: &Browser, settings: &Settings, args: &RunArgs) -> Result<()> {
    browser.goto(&args.url).await?;

    let session = FollowChecker::new(browser, settings, args.log_mode())
        .run()
        .await?;

    print_report(&session, args.format)?;
    save_exports(&session, args)?;

    session.into_result()?;
    Ok(())
}

fn print_report(session: &FollowSession, format: OutputFormat) -> Result<()> {
    let Some(report) = session.report() else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Simple => print!("{}", report.render_console()),
    }
    Ok(())
}

fn save_exports(session: &FollowSession, args: &RunArgs) -> Result<()> {
    if args.save_results {
        if session.comparison.is_some() {
            let path = session
                .download_results(&args.output_dir)
                .context("Failed to save results")?;
            info!("Results saved to {}", path.display());
            eprintln!("Results saved to {}", path.display());
        } else {
            eprintln!("No comparison results available to download");
        }
    }

    if args.save_logs
        && let Some(path) = session
            .download_logs(&args.output_dir)
            .context("Failed to save logs")?
    {
        eprintln!("Logs saved to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(args: &[&str]) -> RunArgs {
        let mut argv = vec!["followcheck"];
        argv.extend_from_slice(args);
        Wrapper::try_parse_from(argv).unwrap().run
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["https://www.instagram.com/me/"]);
        assert_eq!(args.browser, "firefox");
        assert_eq!(args.log_mode(), LogMode::Quiet);
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(!args.save_results);
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timing]\ndialog_open_ms = 4000\n").unwrap();

        let args = parse(&[
            "https://www.instagram.com/me/",
            "--config",
            path.to_str().unwrap(),
            "--preset",
            "brisk",
            "--order",
            "alphabetical",
            "--log",
        ]);
        let settings = args.settings().unwrap();

        assert_eq!(settings.timing.max_attempts, 200);
        assert_eq!(settings.timing.dialog_open_ms, 4000);
        assert_eq!(settings.site.order, ResultOrder::Alphabetical);
        assert_eq!(args.log_mode(), LogMode::Verbose);
    }
}
