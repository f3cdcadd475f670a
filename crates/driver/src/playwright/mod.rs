//! Playwright browser automation over a Node.js bridge
//!
//! Each launched browser runs in its own `node` process. Requests and replies
//! are single JSON lines; handles (`h1`, `h2`, ...) name browsers, contexts and
//! pages inside the bridge.

mod bridge;

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{DriverError, DriverResult};
use crate::{Browser, LaunchOptions, Launcher, LoadState, Locator, Page, Session, SessionOptions};
use bridge::Bridge;

#[derive(Debug, Deserialize)]
struct HandleReply {
    handle: String,
}

#[derive(Debug, Deserialize)]
struct Empty {}

/// Configuration for the Playwright bridge
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    /// `node` executable
    pub node_binary: PathBuf,

    /// Directory `require('playwright')` resolves from
    pub node_modules: PathBuf,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            node_binary: PathBuf::from("node"),
            node_modules: PathBuf::from("node_modules"),
        }
    }
}

/// Launches Playwright browsers, one bridge process per browser
#[derive(Debug, Clone)]
pub struct PlaywrightLauncher {
    config: PlaywrightConfig,
}

impl PlaywrightLauncher {
    pub fn new(mut config: PlaywrightConfig) -> Self {
        // NODE_PATH must be absolute: the bridge script lives in a temp dir
        if config.node_modules.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                config.node_modules = cwd.join(&config.node_modules);
            }
        }
        Self { config }
    }

    /// Check that node is runnable and can resolve the playwright package
    pub async fn probe(&self) -> DriverResult<()> {
        let status = Command::new(&self.config.node_binary)
            .args(["-e", "require.resolve('playwright')"])
            .env("NODE_PATH", &self.config.node_modules)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(_) => Err(DriverError::Unavailable(format!(
                "playwright not found under {}. Install with: npm install playwright && npx playwright install",
                self.config.node_modules.display()
            ))),
            Err(e) => Err(DriverError::Unavailable(format!(
                "cannot run {}: {}",
                self.config.node_binary.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl Launcher for PlaywrightLauncher {
    async fn launch(&self, options: &LaunchOptions) -> DriverResult<Box<dyn Browser>> {
        let bridge = Bridge::spawn(&self.config.node_binary, &self.config.node_modules).await?;

        let launched: DriverResult<HandleReply> = bridge
            .call(
                "launch",
                json!({
                    "browser": options.browser.as_str(),
                    "headless": options.headless,
                    "slowMo": options.slow_mo.as_millis() as u64,
                }),
            )
            .await;

        let reply = match launched {
            Ok(reply) => reply,
            Err(e) => {
                let _ = bridge.shutdown().await;
                return Err(e);
            }
        };

        info!(
            "Launched {} (headless: {}, slow_mo: {:?})",
            options.browser, options.headless, options.slow_mo
        );

        Ok(Box::new(PlaywrightBrowser {
            bridge,
            handle: reply.handle,
        }))
    }
}

struct PlaywrightBrowser {
    bridge: Arc<Bridge>,
    handle: String,
}

#[async_trait]
impl Browser for PlaywrightBrowser {
    async fn new_session(&self, options: &SessionOptions) -> DriverResult<Box<dyn Session>> {
        let reply: HandleReply = self
            .bridge
            .call(
                "newContext",
                json!({
                    "browser": self.handle,
                    "viewport": options.viewport,
                    "baseURL": options.base_url,
                }),
            )
            .await?;

        Ok(Box::new(PlaywrightSession {
            bridge: Arc::clone(&self.bridge),
            handle: reply.handle,
        }))
    }

    async fn close(&self) -> DriverResult<()> {
        let closed: DriverResult<Empty> =
            self.bridge.call("close", json!({ "handle": self.handle })).await;
        // The process goes away even if the browser refused to close
        let stopped = self.bridge.shutdown().await;
        closed?;
        stopped
    }
}

struct PlaywrightSession {
    bridge: Arc<Bridge>,
    handle: String,
}

#[async_trait]
impl Session for PlaywrightSession {
    async fn new_page(&self) -> DriverResult<Arc<dyn Page>> {
        let reply: HandleReply = self
            .bridge
            .call("newPage", json!({ "context": self.handle }))
            .await?;

        Ok(Arc::new(PlaywrightPage {
            bridge: Arc::clone(&self.bridge),
            handle: reply.handle,
        }))
    }

    async fn close(&self) -> DriverResult<()> {
        let _: Empty = self.bridge.call("close", json!({ "handle": self.handle })).await?;
        Ok(())
    }
}

struct PlaywrightPage {
    bridge: Arc<Bridge>,
    handle: String,
}

fn millis(timeout: Duration) -> u64 {
    timeout.as_millis() as u64
}

#[async_trait]
impl Page for PlaywrightPage {
    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> DriverResult<()> {
        debug!("goto {}", url);
        let _: Empty = self
            .bridge
            .call(
                "goto",
                json!({
                    "page": self.handle,
                    "url": url,
                    "waitUntil": wait_until,
                    "timeout": millis(timeout),
                }),
            )
            .await?;
        Ok(())
    }

    async fn wait_for_visible(&self, locator: &Locator, timeout: Duration) -> DriverResult<()> {
        let _: Empty = self
            .bridge
            .call(
                "waitFor",
                json!({
                    "page": self.handle,
                    "selector": locator.selector(),
                    "state": "visible",
                    "timeout": millis(timeout),
                }),
            )
            .await?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> DriverResult<()> {
        let _: Empty = self
            .bridge
            .call("click", json!({ "page": self.handle, "selector": locator.selector() }))
            .await?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> DriverResult<()> {
        let _: Empty = self
            .bridge
            .call(
                "fill",
                json!({ "page": self.handle, "selector": locator.selector(), "value": value }),
            )
            .await?;
        Ok(())
    }

    async fn text_content(&self, locator: &Locator) -> DriverResult<Option<String>> {
        #[derive(Deserialize)]
        struct Text {
            text: Option<String>,
        }

        let reply: Text = self
            .bridge
            .call("textContent", json!({ "page": self.handle, "selector": locator.selector() }))
            .await?;
        Ok(reply.text)
    }

    async fn count(&self, locator: &Locator) -> DriverResult<usize> {
        #[derive(Deserialize)]
        struct Count {
            count: usize,
        }

        let reply: Count = self
            .bridge
            .call("count", json!({ "page": self.handle, "selector": locator.selector() }))
            .await?;
        Ok(reply.count)
    }

    async fn url(&self) -> DriverResult<String> {
        #[derive(Deserialize)]
        struct Url {
            url: String,
        }

        let reply: Url = self.bridge.call("url", json!({ "page": self.handle })).await?;
        Ok(reply.url)
    }

    async fn title(&self) -> DriverResult<String> {
        #[derive(Deserialize)]
        struct Title {
            title: String,
        }

        let reply: Title = self.bridge.call("title", json!({ "page": self.handle })).await?;
        Ok(reply.title)
    }

    async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> DriverResult<()> {
        let _: Empty = self
            .bridge
            .call(
                "waitForURL",
                json!({ "page": self.handle, "pattern": pattern, "timeout": millis(timeout) }),
            )
            .await?;
        Ok(())
    }

    async fn screenshot(&self, full_page: bool) -> DriverResult<Vec<u8>> {
        #[derive(Deserialize)]
        struct Shot {
            data: String,
        }

        let reply: Shot = self
            .bridge
            .call("screenshot", json!({ "page": self.handle, "fullPage": full_page }))
            .await?;
        base64::engine::general_purpose::STANDARD
            .decode(reply.data)
            .map_err(|e| DriverError::Protocol(format!("screenshot payload: {}", e)))
    }

    async fn set_default_timeout(&self, timeout: Duration) -> DriverResult<()> {
        let _: Empty = self
            .bridge
            .call(
                "setDefaultTimeout",
                json!({ "page": self.handle, "timeout": millis(timeout) }),
            )
            .await?;
        Ok(())
    }

    async fn close(&self) -> DriverResult<()> {
        let _: Empty = self.bridge.call("close", json!({ "handle": self.handle })).await?;
        Ok(())
    }
}
