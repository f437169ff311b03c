// Command line behaviour that does not need a browser
use anyhow::Result;
use tempfile::TempDir;

mod common;
use common::run_command;

#[test]
fn test_version() -> Result<()> {
    let home = TempDir::new()?;
    let output = run_command(home.path(), &["version"])?;

    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.starts_with("followcheck v"));
    assert!(output.stdout.contains("not found"));
    Ok(())
}

#[test]
fn test_config_show_defaults() -> Result<()> {
    let home = TempDir::new()?;
    let output = run_command(home.path(), &["config", "show"])?;

    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains("[timing]"));
    assert!(output.stdout.contains("max_attempts = 300"));
    assert!(output.stdout.contains("host = \"instagram.com\""));
    Ok(())
}

#[test]
fn test_config_init_then_path() -> Result<()> {
    let home = TempDir::new()?;

    let output = run_command(home.path(), &["config", "path"])?;
    assert_eq!(output.exit_code, 0);
    let path = std::path::PathBuf::from(output.stdout.trim());
    assert!(path.starts_with(home.path()));
    assert!(path.ends_with("followcheck/config.toml"));

    let output = run_command(home.path(), &["config", "init"])?;
    assert_eq!(output.exit_code, 0);
    assert!(path.exists());

    // A second init refuses to overwrite
    let output = run_command(home.path(), &["config", "init"])?;
    assert_eq!(output.exit_code, 1);
    assert_eq!(output.json()["error"], true);
    assert_eq!(output.json()["exit_code"], 1);

    let output = run_command(home.path(), &["config", "init", "--force"])?;
    assert_eq!(output.exit_code, 0);
    Ok(())
}

#[test]
fn test_config_show_reads_file() -> Result<()> {
    let home = TempDir::new()?;
    let file = home.path().join("brisk.toml");
    std::fs::write(&file, "[timing]\nmax_attempts = 42\n\n[site]\norder = \"alphabetical\"\n")?;

    let output = run_command(home.path(), &["config", "show", "--config", file.to_str().unwrap()])?;

    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains("max_attempts = 42"));
    assert!(output.stdout.contains("order = \"alphabetical\""));
    Ok(())
}

#[test]
fn test_run_rejects_invalid_settings() -> Result<()> {
    let home = TempDir::new()?;
    let file = home.path().join("bad.toml");
    std::fs::write(&file, "[timing]\nstable_threshold = 0\n")?;

    let output = run_command(
        home.path(),
        &["run", "https://www.instagram.com/me/", "--config", file.to_str().unwrap()],
    )?;

    assert_eq!(output.exit_code, 1);
    let json = output.json();
    assert_eq!(json["error"], true);
    assert!(json["message"].as_str().unwrap().contains("stable_threshold"));
    Ok(())
}

#[test]
fn test_run_rejects_unknown_browser() -> Result<()> {
    let home = TempDir::new()?;
    let output = run_command(
        home.path(),
        &["run", "https://www.instagram.com/me/", "--browser", "safari"],
    )?;

    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("Unsupported browser: safari"));
    Ok(())
}

#[test]
fn test_invalid_arguments() -> Result<()> {
    let home = TempDir::new()?;

    let output = run_command(home.path(), &["run"])?;
    assert_ne!(output.exit_code, 0);

    let output = run_command(
        home.path(),
        &["run", "https://www.instagram.com/me/", "--preset", "turbo"],
    )?;
    assert_ne!(output.exit_code, 0);
    assert!(output.stderr.contains("turbo"));
    Ok(())
}

#[test]
fn test_profile_lifecycle() -> Result<()> {
    let home = TempDir::new()?;

    let output = run_command(home.path(), &["profile", "create", "insta", "--browser", "chrome"])?;
    assert_eq!(output.exit_code, 0);
    assert!(home.path().join(".followcheck/profiles/insta/metadata.json").exists());

    let output = run_command(home.path(), &["profile", "list", "--format", "json"])?;
    let profiles = output.json();
    assert_eq!(profiles.as_array().map(|p| p.len()), Some(1));
    assert_eq!(profiles[0]["name"], "insta");
    assert_eq!(profiles[0]["browser"], "chrome");

    let output = run_command(home.path(), &["profile", "delete", "insta"])?;
    assert_eq!(output.exit_code, 0);

    let output = run_command(home.path(), &["profile", "delete", "insta"])?;
    assert_eq!(output.exit_code, 1);
    assert!(output.json()["message"].as_str().unwrap().contains("does not exist"));
    Ok(())
}
