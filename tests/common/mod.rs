// Shared helpers for integration tests
#![allow(dead_code)]

use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use std::process::Command;
use axum::Router;
use axum::response::Html;
use axum::routing::get;
use tokio::net::TcpListener;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    /// stdout parsed as JSON, `Value::Null` if it is not JSON
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or(Value::Null)
    }
}

/// Run followcheck with HOME and the config directory pointed at `home`
pub fn run_command(home: &Path, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(env!("CARGO_BIN_EXE_followcheck"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Serve `body` as the profile page at `/me/` on a random local port.
/// Returns the base URL.
pub async fn serve_fixture(body: &'static str) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/me/", get(move || async move { Html(body) }));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("Fixture server stopped: {}", e);
        }
    });

    Ok(format!("http://{}", addr))
}
