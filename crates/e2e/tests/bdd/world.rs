use std::time::{Duration, Instant};

use storefront_e2e::screens::Screens;
use storefront_e2e::{ExecutionContext, HarnessError, HarnessResult, Ui};

/// Waits used by the steps for page transitions
pub const PAGE_TRANSITION: Duration = Duration::from_millis(10_000);

/// Per-scenario state; the lifecycle hooks fill `context` before the first step
#[derive(Debug, Default, cucumber::World)]
pub struct ShopWorld {
    pub context: Option<ExecutionContext>,
    pub started: Option<Instant>,
}

impl ShopWorld {
    fn context(&self) -> HarnessResult<&ExecutionContext> {
        self.context.as_ref().ok_or(HarnessError::NotProvisioned)
    }

    pub fn screens(&self) -> HarnessResult<&Screens> {
        self.context()?.screens()
    }

    pub fn ui(&self) -> HarnessResult<&Ui> {
        self.context()?.ui()
    }
}
