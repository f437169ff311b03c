use anyhow::Result;

pub async fn handle_version() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const NAME: &str = env!("CARGO_PKG_NAME");
    const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

    println!("{} v{}", NAME, VERSION);
    println!("By: {}", AUTHORS);

    if let Some(path) = followcheck::config::Settings::default_path() {
        let state = if path.exists() { "found" } else { "not found" };
        println!("Settings: {} ({})", path.display(), state);
    }
    Ok(())
}
