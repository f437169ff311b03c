use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder, Locator};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::page::{BoxMetrics, ClickTarget, ElementProbe, Page, ScrollMetrics};
use crate::profile::ProfileManager;
use crate::types::ViewportSize;
use crate::webdriver_manager::{GLOBAL_WEBDRIVER_MANAGER, WebDriverManager};

/// Browser instance for WebDriver automation
pub struct Browser {
    pub(crate) client: Client,
    /// Throwaway profile removed on close
    temp_profile: Option<PathBuf>,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Executable name of the matching WebDriver
    pub fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }

    /// Ports tried before asking the OS for one
    pub fn preferred_ports(&self) -> [u16; 3] {
        match self {
            BrowserType::Firefox => [4444, 4445, 4446],
            BrowserType::Chrome => [9515, 9516, 9517],
        }
    }

    /// Command line arguments that make the driver listen on `port`
    pub fn driver_args(&self, port: u16) -> Vec<String> {
        match self {
            BrowserType::Firefox => vec!["--port".to_string(), port.to_string()],
            BrowserType::Chrome => vec![format!("--port={}", port)],
        }
    }
}

const PROBE_SCRIPT: &str = r#"
    const el = document.querySelector(arguments[0]);
    if (!el) return null;
    const cls = typeof el.className === 'string' ? el.className : (el.getAttribute('class') || '');
    return {
        tag: el.tagName.toLowerCase(),
        text: (el.textContent || '').trim(),
        class_name: cls
    };
"#;

const SCRIPT_CLICK: &str = r#"
    const el = document.querySelector(arguments[0]);
    if (!el) return false;
    const target = arguments[1] ? el.parentElement : el;
    if (!target || typeof target.click !== 'function') return false;
    target.click();
    return true;
"#;

const DIALOG_BOXES_SCRIPT: &str = r#"
    const dialog = document.querySelector(arguments[0]);
    if (!dialog) return null;
    return Array.from(dialog.querySelectorAll('div')).map((div, index) => {
        const style = window.getComputedStyle(div);
        return {
            index: index,
            class_name: typeof div.className === 'string' ? div.className : '',
            overflow_y: style.overflowY,
            client_height: div.clientHeight,
            scroll_height: div.scrollHeight
        };
    });
"#;

const MARK_BOX_SCRIPT: &str = r#"
    const dialogSelector = arguments[0];
    const index = arguments[1];
    const marker = arguments[2];
    const dialog = document.querySelector(dialogSelector);
    if (!dialog) return false;
    document.querySelectorAll('[' + marker + ']').forEach(el => el.removeAttribute(marker));
    const div = dialog.querySelectorAll('div')[index];
    if (!div) return false;
    div.setAttribute(marker, '');
    return true;
"#;

const SCROLL_METRICS_SCRIPT: &str = r#"
    const el = document.querySelector(arguments[0]);
    if (!el) return null;
    if (arguments[1]) el.scrollTop = el.scrollHeight;
    return {
        scroll_top: Math.round(el.scrollTop),
        scroll_height: el.scrollHeight,
        client_height: el.clientHeight
    };
"#;

const LINK_TARGETS_SCRIPT: &str = r#"
    const dialog = document.querySelector(arguments[0]);
    if (!dialog) return null;
    return Array.from(dialog.querySelectorAll(arguments[1]))
        .map(a => a.href)
        .filter(href => typeof href === 'string' && href.length > 0);
"#;

const ESCAPE_SCRIPT: &str = r#"
    document.dispatchEvent(new KeyboardEvent('keydown', {
        key: 'Escape',
        code: 'Escape',
        keyCode: 27,
        which: 27,
        bubbles: true
    }));
"#;

impl Browser {
    /// Create a new browser instance
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `profile` - Named persistent profile; a throwaway one is used otherwise
    /// * `viewport` - Optional viewport dimensions
    /// * `headless` - Whether to run in headless mode
    pub async fn new(
        browser_type: BrowserType,
        profile: Option<String>,
        viewport: Option<ViewportSize>,
        headless: bool,
    ) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", browser_type);

        // Starts the driver if nothing is listening yet
        let webdriver_url = GLOBAL_WEBDRIVER_MANAGER
            .ensure_driver(&browser_type)
            .await?;

        if !WebDriverManager::is_driver_running(&webdriver_url).await {
            let driver_name = browser_type.driver_name();
            anyhow::bail!(
                "Cannot connect to {} WebDriver at {}.\n\
                Please ensure {} is running:\n\
                  For Firefox: geckodriver --port 4444\n\
                  For Chrome: chromedriver --port 9515",
                driver_name,
                webdriver_url,
                driver_name
            );
        }

        let (profile_path, temporary) = Self::resolve_profile(browser_type, profile)?;
        let caps = Self::capabilities(browser_type, &profile_path, viewport.as_ref(), headless);

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        if let Some(vp) = viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                // Window sizing is best-effort
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(Browser {
            client,
            temp_profile: temporary.then_some(profile_path),
        })
    }

    fn resolve_profile(
        browser_type: BrowserType,
        profile: Option<String>,
    ) -> Result<(PathBuf, bool)> {
        let browser_name = format!("{browser_type:?}").to_lowercase();
        let manager = ProfileManager::new()?;

        match profile {
            // Persistent profile keeps the cookies of a session the user logged into
            Some(name) => Ok((manager.open_or_create(&name, &browser_name)?, false)),
            None => {
                if let Err(e) = manager.cleanup_old_profiles(1) {
                    debug!("Error cleaning up temporary profiles: {}", e);
                }
                Ok((manager.create_temporary_profile(&browser_name)?, true))
            }
        }
    }

    fn capabilities(
        browser_type: BrowserType,
        profile_path: &std::path::Path,
        viewport: Option<&ViewportSize>,
        headless: bool,
    ) -> serde_json::Map<String, Value> {
        let mut caps = serde_json::Map::new();

        match browser_type {
            BrowserType::Firefox => {
                let mut args = Vec::new();
                if headless {
                    args.push("--headless".to_string());
                }
                if let Some(vp) = viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }
                args.push("-profile".to_string());
                args.push(profile_path.display().to_string());

                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
            BrowserType::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                if let Some(vp) = viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }
                args.push(format!("--user-data-dir={}", profile_path.display()));

                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
        }

        caps
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.client.goto(url).await?;

        // Wait for the page to be ready, 2 seconds at most
        for _ in 0..20 {
            match self
                .client
                .execute("return document.readyState === 'complete';", vec![])
                .await
            {
                Ok(val) if val.as_bool().unwrap_or(false) => break,
                _ => tokio::time::sleep(tokio::time::Duration::from_millis(100)).await,
            }
        }

        Ok(())
    }

    async fn script<T: DeserializeOwned>(&self, script: &str, args: Vec<Value>) -> Result<T> {
        let value = self
            .client
            .execute(script, args)
            .await
            .context("Failed to execute script")?;
        serde_json::from_value(value).context("Unexpected script result")
    }

    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        if let Some(path) = self.temp_profile
            && let Err(e) = std::fs::remove_dir_all(&path)
        {
            debug!("Could not remove temporary profile {}: {}", path.display(), e);
        }
        Ok(())
    }
}

impl Page for Browser {
    async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn probe(&self, selector: &str) -> Result<Option<ElementProbe>> {
        self.script(PROBE_SCRIPT, vec![json!(selector)]).await
    }

    async fn click(&self, selector: &str, target: ClickTarget) -> Result<()> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .context(format!("Element not found: {}", selector))?;
        let element = match target {
            ClickTarget::Element => element,
            ClickTarget::Parent => element
                .find(Locator::XPath(".."))
                .await
                .context(format!("No parent for: {}", selector))?,
        };

        if let Err(e) = element.click().await {
            // Overlays on the target site often intercept native clicks
            debug!("Native click on {} failed ({}), using script click", selector, e);
            let clicked: bool = self
                .script(
                    SCRIPT_CLICK,
                    vec![json!(selector), json!(target == ClickTarget::Parent)],
                )
                .await?;
            if !clicked {
                anyhow::bail!("Could not click {}", selector);
            }
        }
        Ok(())
    }

    async fn dialog_boxes(&self, dialog: &str) -> Result<Option<Vec<BoxMetrics>>> {
        self.script(DIALOG_BOXES_SCRIPT, vec![json!(dialog)]).await
    }

    async fn mark_dialog_box(&self, dialog: &str, index: usize, marker: &str) -> Result<bool> {
        self.script(
            MARK_BOX_SCRIPT,
            vec![json!(dialog), json!(index), json!(marker)],
        )
        .await
    }

    async fn scroll_metrics(&self, selector: &str) -> Result<Option<ScrollMetrics>> {
        self.script(SCROLL_METRICS_SCRIPT, vec![json!(selector), json!(false)])
            .await
    }

    async fn scroll_to_end(&self, selector: &str) -> Result<Option<ScrollMetrics>> {
        self.script(SCROLL_METRICS_SCRIPT, vec![json!(selector), json!(true)])
            .await
    }

    async fn link_targets(&self, dialog: &str, anchors: &str) -> Result<Option<Vec<String>>> {
        self.script(LINK_TARGETS_SCRIPT, vec![json!(dialog), json!(anchors)])
            .await
    }

    async fn dispatch_escape(&self) -> Result<()> {
        self.client
            .execute(ESCAPE_SCRIPT, vec![])
            .await
            .context("Failed to dispatch Escape")?;
        Ok(())
    }
}
