//! In-memory page model
//!
//! A scripted stand-in for a real browser. Elements are keyed by their full
//! selector string, visibility can be scheduled, clicks and navigations can
//! trigger reactions that rewrite the page, and every handle operation is
//! appended to a journal so callers can assert on ordering.
//!
//! All handles created from one `MemoryLauncher` share the same page state
//! and journal.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{sleep, Instant};
use url::Url;

use crate::error::{DriverError, DriverResult};
use crate::{
    glob, Browser, LaunchOptions, Launcher, LoadState, Locator, Page, Session, SessionOptions,
    Viewport,
};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Smallest byte sequence that identifies as PNG
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Journal entry; close entries are recorded when the close is attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Launched { headless: bool, slow_mo: Duration },
    SessionOpened { base_url: String, viewport: Viewport },
    PageOpened,
    DefaultTimeout(Duration),
    Navigated(String),
    Clicked(String),
    Filled { selector: String, value: String },
    Screenshot { full_page: bool },
    PageClosed,
    SessionClosed,
    BrowserClosed,
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Launch,
    NewSession,
    NewPage,
    Goto,
    Screenshot,
    ClosePage,
    CloseSession,
    CloseBrowser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    /// Becomes visible this long after a wait starts observing it
    After(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub visibility: Visibility,
    pub text: Option<String>,
    /// How many nodes the selector matches
    pub count: usize,
}

impl Element {
    pub fn visible() -> Self {
        Self {
            visibility: Visibility::Visible,
            text: None,
            count: 1,
        }
    }

    pub fn hidden() -> Self {
        Self {
            visibility: Visibility::Hidden,
            ..Self::visible()
        }
    }

    pub fn appearing_after(delay: Duration) -> Self {
        Self {
            visibility: Visibility::After(delay),
            ..Self::visible()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// Mutable page content
#[derive(Debug, Default)]
pub struct Dom {
    url: String,
    title: String,
    elements: HashMap<String, Element>,
    values: HashMap<String, String>,
}

impl Dom {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn insert(&mut self, selector: impl Into<String>, element: Element) {
        self.elements.insert(selector.into(), element);
    }

    pub fn remove(&mut self, selector: &str) -> Option<Element> {
        self.elements.remove(selector)
    }

    pub fn get(&self, selector: &str) -> Option<&Element> {
        self.elements.get(selector)
    }

    /// Current value of a filled input
    pub fn value(&self, selector: &str) -> Option<&str> {
        self.values.get(selector).map(String::as_str)
    }

    /// Drop all elements and input values, keeping the URL
    pub fn clear(&mut self) {
        self.elements.clear();
        self.values.clear();
    }
}

type Reaction = Arc<dyn Fn(&mut Dom) + Send + Sync>;

#[derive(Default)]
struct State {
    journal: Vec<Event>,
    dom: Dom,
    failing: HashSet<FailPoint>,
    on_click: HashMap<String, Reaction>,
    on_goto: HashMap<String, Reaction>,
    goto_delay: HashMap<String, Duration>,
    screenshot: Option<Vec<u8>>,
}

impl State {
    fn check(&self, point: FailPoint) -> DriverResult<()> {
        if self.failing.contains(&point) {
            return Err(DriverError::Remote {
                name: "InjectedFailure".to_string(),
                message: format!("{:?} failed", point),
            });
        }
        Ok(())
    }
}

/// Launcher for in-memory browsers
#[derive(Clone, Default)]
pub struct MemoryLauncher {
    state: Arc<Mutex<State>>,
}

impl MemoryLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> Vec<Event> {
        self.state.lock().journal.clone()
    }

    /// Read or rewrite the page content directly
    pub fn dom<R>(&self, f: impl FnOnce(&mut Dom) -> R) -> R {
        f(&mut self.state.lock().dom)
    }

    /// Run `reaction` after every click on `selector`
    pub fn on_click(&self, selector: impl Into<String>, reaction: impl Fn(&mut Dom) + Send + Sync + 'static) {
        self.state
            .lock()
            .on_click
            .insert(selector.into(), Arc::new(reaction));
    }

    /// Run `reaction` after every navigation to `path` (as passed to `goto`)
    pub fn on_goto(&self, path: impl Into<String>, reaction: impl Fn(&mut Dom) + Send + Sync + 'static) {
        self.state
            .lock()
            .on_goto
            .insert(path.into(), Arc::new(reaction));
    }

    /// Make navigations to `path` take `delay` before the page is ready
    pub fn delay_goto(&self, path: impl Into<String>, delay: Duration) {
        self.state.lock().goto_delay.insert(path.into(), delay);
    }

    pub fn fail(&self, point: FailPoint) {
        self.state.lock().failing.insert(point);
    }

    pub fn set_screenshot(&self, png: Vec<u8>) {
        self.state.lock().screenshot = Some(png);
    }
}

#[async_trait]
impl Launcher for MemoryLauncher {
    async fn launch(&self, options: &LaunchOptions) -> DriverResult<Box<dyn Browser>> {
        let mut state = self.state.lock();
        state.check(FailPoint::Launch)?;
        state.journal.push(Event::Launched {
            headless: options.headless,
            slow_mo: options.slow_mo,
        });
        Ok(Box::new(MemoryBrowser {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MemoryBrowser {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl Browser for MemoryBrowser {
    async fn new_session(&self, options: &SessionOptions) -> DriverResult<Box<dyn Session>> {
        let base_url = Url::parse(&options.base_url)
            .map_err(|e| DriverError::Protocol(format!("invalid base url {}: {}", options.base_url, e)))?;

        let mut state = self.state.lock();
        state.check(FailPoint::NewSession)?;
        state.journal.push(Event::SessionOpened {
            base_url: options.base_url.clone(),
            viewport: options.viewport,
        });
        Ok(Box::new(MemorySession {
            state: Arc::clone(&self.state),
            base_url,
        }))
    }

    async fn close(&self) -> DriverResult<()> {
        let mut state = self.state.lock();
        state.journal.push(Event::BrowserClosed);
        state.check(FailPoint::CloseBrowser)
    }
}

struct MemorySession {
    state: Arc<Mutex<State>>,
    base_url: Url,
}

#[async_trait]
impl Session for MemorySession {
    async fn new_page(&self) -> DriverResult<Arc<dyn Page>> {
        let mut state = self.state.lock();
        state.check(FailPoint::NewPage)?;
        state.journal.push(Event::PageOpened);
        Ok(Arc::new(MemoryPage {
            state: Arc::clone(&self.state),
            base_url: self.base_url.clone(),
            closed: AtomicBool::new(false),
        }))
    }

    async fn close(&self) -> DriverResult<()> {
        let mut state = self.state.lock();
        state.journal.push(Event::SessionClosed);
        state.check(FailPoint::CloseSession)
    }
}

struct MemoryPage {
    state: Arc<Mutex<State>>,
    base_url: Url,
    closed: AtomicBool,
}

impl MemoryPage {
    fn ensure_open(&self) -> DriverResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DriverError::Closed("page".to_string()));
        }
        Ok(())
    }

    fn element(&self, locator: &Locator) -> DriverResult<Element> {
        self.state
            .lock()
            .dom
            .get(locator.selector())
            .cloned()
            .ok_or_else(|| DriverError::NotFound(locator.selector().to_string()))
    }
}

#[async_trait]
impl Page for MemoryPage {
    async fn goto(&self, url: &str, _wait_until: LoadState, timeout: Duration) -> DriverResult<()> {
        self.ensure_open()?;
        let resolved = self
            .base_url
            .join(url)
            .map_err(|e| DriverError::Protocol(format!("cannot resolve {}: {}", url, e)))?;

        let delay = self.state.lock().goto_delay.get(url).copied();
        if let Some(delay) = delay {
            if delay > timeout {
                sleep(timeout).await;
                return Err(DriverError::Timeout(format!(
                    "{} not loaded after {:?}",
                    resolved, timeout
                )));
            }
            sleep(delay).await;
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.check(FailPoint::Goto)?;
        state.journal.push(Event::Navigated(resolved.to_string()));
        state.dom.set_url(resolved.as_str());
        if let Some(reaction) = state.on_goto.get(url).cloned() {
            reaction(&mut state.dom);
        }
        Ok(())
    }

    async fn wait_for_visible(&self, locator: &Locator, timeout: Duration) -> DriverResult<()> {
        let start = Instant::now();
        loop {
            self.ensure_open()?;
            let visibility = self
                .state
                .lock()
                .dom
                .get(locator.selector())
                .map(|el| el.visibility);

            match visibility {
                Some(Visibility::Visible) => return Ok(()),
                Some(Visibility::After(delay)) if start.elapsed() >= delay => return Ok(()),
                _ => {}
            }

            if start.elapsed() >= timeout {
                return Err(DriverError::Timeout(format!(
                    "{} not visible after {:?}",
                    locator, timeout
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, locator: &Locator) -> DriverResult<()> {
        self.ensure_open()?;
        self.element(locator)?;

        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.journal.push(Event::Clicked(locator.selector().to_string()));
        if let Some(reaction) = state.on_click.get(locator.selector()).cloned() {
            reaction(&mut state.dom);
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> DriverResult<()> {
        self.ensure_open()?;
        self.element(locator)?;

        let mut state = self.state.lock();
        state.journal.push(Event::Filled {
            selector: locator.selector().to_string(),
            value: value.to_string(),
        });
        state
            .dom
            .values
            .insert(locator.selector().to_string(), value.to_string());
        Ok(())
    }

    async fn text_content(&self, locator: &Locator) -> DriverResult<Option<String>> {
        self.ensure_open()?;
        Ok(self.element(locator)?.text)
    }

    async fn count(&self, locator: &Locator) -> DriverResult<usize> {
        self.ensure_open()?;
        Ok(self
            .state
            .lock()
            .dom
            .get(locator.selector())
            .map(|el| el.count)
            .unwrap_or(0))
    }

    async fn url(&self) -> DriverResult<String> {
        self.ensure_open()?;
        Ok(self.state.lock().dom.url.clone())
    }

    async fn title(&self) -> DriverResult<String> {
        self.ensure_open()?;
        Ok(self.state.lock().dom.title.clone())
    }

    async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> DriverResult<()> {
        let matcher = glob::to_regex(pattern)?;
        let start = Instant::now();
        loop {
            self.ensure_open()?;
            let current = self.state.lock().dom.url.clone();
            if matcher.is_match(&current) {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(DriverError::Timeout(format!(
                    "url never matched {} within {:?}",
                    pattern, timeout
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn screenshot(&self, full_page: bool) -> DriverResult<Vec<u8>> {
        self.ensure_open()?;
        let mut state = self.state.lock();
        state.check(FailPoint::Screenshot)?;
        state.journal.push(Event::Screenshot { full_page });
        Ok(state
            .screenshot
            .clone()
            .unwrap_or_else(|| PNG_SIGNATURE.to_vec()))
    }

    async fn set_default_timeout(&self, timeout: Duration) -> DriverResult<()> {
        self.ensure_open()?;
        self.state.lock().journal.push(Event::DefaultTimeout(timeout));
        Ok(())
    }

    async fn close(&self) -> DriverResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        let mut state = self.state.lock();
        state.journal.push(Event::PageClosed);
        state.check(FailPoint::ClosePage)
    }
}
