use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::webdriver::BrowserType;

/// Starts and tracks geckodriver/chromedriver processes for the run
pub struct WebDriverManager {
    processes: Arc<Mutex<Vec<WebDriverProcess>>>,
}

struct WebDriverProcess {
    browser_type: BrowserType,
    child: Child,
    port: u16,
    url: String,
    #[cfg(unix)]
    process_group_id: Option<i32>,
}

impl Default for WebDriverManager {
    fn default() -> Self {
        Self {
            processes: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl WebDriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a WebDriver is running for the given browser type.
    /// Returns the URL to connect to.
    pub async fn ensure_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let managed_urls: Vec<String> = {
            let processes = self.processes.lock().unwrap();
            processes
                .iter()
                .filter(|p| p.browser_type == *browser_type)
                .map(|p| p.url.clone())
                .collect()
        };

        for url in managed_urls {
            if Self::verify_driver_working(&url).await {
                debug!("Using existing managed WebDriver at {}", url);
                return Ok(url);
            }
        }

        // A driver the user started by hand on the standard port
        let standard_url = format!("http://localhost:{}", browser_type.preferred_ports()[0]);
        if Self::is_driver_running(&standard_url).await
            && Self::verify_driver_working(&standard_url).await
        {
            debug!("Found external WebDriver at {}", standard_url);
            return Ok(standard_url);
        }

        info!("WebDriver not detected, attempting to start automatically...");
        self.start_driver(browser_type).await
    }

    async fn start_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let command = browser_type.driver_name();
        let port = Self::find_free_port_for_browser(browser_type)?;
        info!("Starting {} on port {}", command, port);

        if !Self::command_exists(command) {
            anyhow::bail!(
                "{} not found in PATH. Please install it:\n\
                  macOS: brew install {}\n\
                  Linux: Download from official releases\n\
                  Or see: https://www.selenium.dev/documentation/webdriver/getting_started/install_drivers/",
                command,
                command
            );
        }

        let mut cmd = Command::new(command);
        cmd.args(browser_type.driver_args(port))
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // New process group so the browser children go down with the driver
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd
            .spawn()
            .context(format!("Failed to start {}", command))?;

        #[cfg(unix)]
        let process_group_id = Some(child.id() as i32);

        let url = format!("http://localhost:{}", port);

        {
            let mut processes = self.processes.lock().unwrap();
            processes.push(WebDriverProcess {
                browser_type: *browser_type,
                child,
                port,
                url: url.clone(),
                #[cfg(unix)]
                process_group_id,
            });
        }

        // 3 seconds total
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            if Self::is_driver_running(&url).await {
                info!("WebDriver started successfully on port {}", port);
                return Ok(url);
            }
            if attempt < max_attempts {
                sleep(Duration::from_millis(100)).await;
            }
        }

        self.cleanup_failed_process(port);
        anyhow::bail!("WebDriver failed to start within timeout")
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        #[cfg(unix)]
        let finder = "which";
        #[cfg(windows)]
        let finder = "where";

        Command::new(finder)
            .arg(command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Preferred driver port if free, otherwise one from the OS
    pub fn find_free_port_for_browser(browser_type: &BrowserType) -> Result<u16> {
        for port in browser_type.preferred_ports() {
            if !Self::is_port_in_use(port) {
                debug!("Found free port {} for {:?}", port, browser_type);
                return Ok(port);
            }
            debug!("Port {} is in use for {:?}", port, browser_type);
        }

        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(port)
    }

    pub fn is_port_in_use(port: u16) -> bool {
        std::net::TcpListener::bind(("127.0.0.1", port)).is_err()
    }

    /// Whether something answers `/status` at `url`
    pub async fn is_driver_running(url: &str) -> bool {
        match Self::status(url).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// A working driver reports `ready: true`
    async fn verify_driver_working(url: &str) -> bool {
        let Ok(response) = Self::status(url).await else {
            return false;
        };
        match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("value")
                .and_then(|v| v.get("ready"))
                .and_then(|r| r.as_bool())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn status(url: &str) -> reqwest::Result<reqwest::Response> {
        reqwest::Client::new()
            .get(format!("{}/status", url))
            .timeout(Duration::from_secs(1))
            .send()
            .await
    }

    #[cfg(unix)]
    fn kill_process_group(pgid: i32) {
        if let Err(e) = Command::new("kill")
            .args(["-TERM", &format!("-{}", pgid)])
            .output()
        {
            debug!("Failed to send SIGTERM to process group {}: {}", pgid, e);
        }

        std::thread::sleep(Duration::from_millis(100));

        if let Err(e) = Command::new("kill")
            .args(["-KILL", &format!("-{}", pgid)])
            .output()
        {
            debug!("Failed to send SIGKILL to process group {}: {}", pgid, e);
        }
    }

    fn terminate(process: &mut WebDriverProcess) {
        #[cfg(unix)]
        if let Some(pgid) = process.process_group_id {
            info!(
                "Killing process group {} for WebDriver on port {}",
                pgid, process.port
            );
            Self::kill_process_group(pgid);
        }

        let _ = process.child.kill();
        let _ = process.child.wait();
    }

    fn cleanup_failed_process(&self, port: u16) {
        let mut processes = self.processes.lock().unwrap();
        if let Some(index) = processes.iter().position(|p| p.port == port) {
            let mut process = processes.remove(index);
            Self::terminate(&mut process);
        }
    }

    /// Number of drivers this manager started and still tracks
    pub fn managed_count(&self) -> usize {
        self.processes.lock().unwrap().len()
    }

    /// Stop all managed WebDriver processes
    pub fn stop_all(&self) {
        let mut processes = self.processes.lock().unwrap();
        for process in processes.iter_mut() {
            debug!("Stopping WebDriver on port {}", process.port);
            Self::terminate(process);
        }
        processes.clear();
    }
}

impl Drop for WebDriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

lazy_static::lazy_static! {
    pub static ref GLOBAL_WEBDRIVER_MANAGER: WebDriverManager = WebDriverManager::new();
}

#[cfg(test)]
#[path = "webdriver_manager_test.rs"]
mod webdriver_manager_test;
