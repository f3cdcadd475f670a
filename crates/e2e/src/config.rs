//! Harness configuration
//!
//! Every setting has a default and can come from a flag or an environment
//! variable. `Settings` is a `clap::Args` so the cucumber runner can flatten it
//! into its own command line; `Settings::from_env` reads the environment only.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser};
use storefront_driver::playwright::{PlaywrightConfig, PlaywrightLauncher};
use storefront_driver::{BrowserKind, LaunchOptions, Launcher, SessionOptions, Viewport};

use crate::error::{HarnessError, HarnessResult};
use crate::ui::ACTION_TIMEOUT;

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Storefront address relative navigations resolve against
    #[arg(long = "base-url", env = "E2E_BASE_URL", default_value = "https://www.saucedemo.com")]
    pub base_url: String,

    /// Run the browser without a window.
    ///
    /// Boolish, in any case: `true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`.
    /// Any other value is a configuration error.
    #[arg(
        long,
        env = "HEADLESS",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub headless: bool,

    /// Delay applied to every browser action, in milliseconds
    #[arg(long = "slow-mo", env = "SLOW_MO", default_value_t = 0)]
    pub slow_mo_ms: u64,

    /// Default page timeout, in milliseconds
    #[arg(long = "timeout-ms", env = "TIMEOUT", default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// REST API address
    #[arg(long = "api-base-url", env = "API_BASE_URL", default_value = "https://reqres.in")]
    pub api_base_url: String,

    /// API credential sent as `x-api-key`
    #[arg(long = "api-key", env = "REQRES_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Browser engine (chromium, firefox, webkit)
    #[arg(long, env = "E2E_BROWSER", default_value = "chromium")]
    pub browser: BrowserKind,

    /// Where failure screenshots are written
    #[arg(long = "screenshot-dir", env = "E2E_SCREENSHOT_DIR", default_value = "reports/screenshots")]
    pub screenshot_dir: PathBuf,

    /// Scenario report (JSON)
    #[arg(long = "report", env = "E2E_REPORT", default_value = "reports/scenarios.json")]
    pub report_path: PathBuf,

    /// Emit logs as one JSON object per line
    #[arg(long = "log-json", env = "E2E_LOG_JSON")]
    pub log_json: bool,

    /// node_modules directory holding the playwright package
    #[arg(long = "node-modules", env = "E2E_NODE_MODULES", default_value = "node_modules")]
    pub node_modules: PathBuf,
}

#[derive(Parser)]
#[command(name = "storefront-e2e")]
struct EnvOnly {
    #[command(flatten)]
    settings: Settings,
}

impl Settings {
    /// Build settings from environment variables and defaults only
    pub fn from_env() -> HarnessResult<Self> {
        Self::from_args(["storefront-e2e"])
    }

    /// Parse settings from an explicit argument list (first item is the binary name)
    pub fn from_args<I, T>(args: I) -> HarnessResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        EnvOnly::try_parse_from(args)
            .map(|cli| cli.settings)
            .map_err(|e| HarnessError::Config(e.to_string()))
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn profile(&self) -> BrowserProfile {
        BrowserProfile {
            launch: LaunchOptions {
                browser: self.browser,
                headless: self.headless,
                slow_mo: Duration::from_millis(self.slow_mo_ms),
            },
            session: SessionOptions {
                viewport: Viewport::default(),
                base_url: self.base_url.clone(),
            },
            default_timeout: self.default_timeout(),
            action_timeout: ACTION_TIMEOUT,
        }
    }

    /// Playwright launcher configured for this run
    pub fn launcher(&self) -> Arc<dyn Launcher> {
        Arc::new(PlaywrightLauncher::new(PlaywrightConfig {
            node_modules: self.node_modules.clone(),
            ..Default::default()
        }))
    }
}

/// Everything an execution context needs to acquire its handles
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub launch: LaunchOptions,
    pub session: SessionOptions,
    /// Page default timeout; also bounds navigations
    pub default_timeout: Duration,
    /// Visibility wait before click/fill/read
    pub action_timeout: Duration,
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self {
            launch: LaunchOptions {
                headless: true,
                ..Default::default()
            },
            session: SessionOptions {
                viewport: Viewport::default(),
                base_url: "https://www.saucedemo.com".to_string(),
            },
            default_timeout: Duration::from_secs(30),
            action_timeout: ACTION_TIMEOUT,
        }
    }
}
