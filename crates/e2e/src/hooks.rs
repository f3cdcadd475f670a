//! Before/after scenario hooks
//!
//! ```text
//!   new_context ──> before_scenario ──> [steps] ──> after_scenario
//!                   ensure artifact dir              failed? snapshot, attach, persist
//!                   provision()                      dispose()   (always, last)
//! ```

use std::sync::Arc;

use chrono::Utc;
use storefront_driver::Launcher;
use tracing::{info, warn};

use crate::artifacts::ArtifactStore;
use crate::config::{BrowserProfile, Settings};
use crate::context::ExecutionContext;
use crate::error::HarnessResult;
use crate::report::{Attachment, ScenarioRecord};

#[derive(Clone)]
pub struct LifecycleHooks {
    launcher: Arc<dyn Launcher>,
    profile: BrowserProfile,
    artifacts: ArtifactStore,
}

impl std::fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("profile", &self.profile)
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

impl LifecycleHooks {
    pub fn new(launcher: Arc<dyn Launcher>, profile: BrowserProfile, artifacts: ArtifactStore) -> Self {
        Self {
            launcher,
            profile,
            artifacts,
        }
    }

    /// Hooks driving real browsers through Playwright
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.launcher(),
            settings.profile(),
            ArtifactStore::new(&settings.screenshot_dir),
        )
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// A fresh, unprovisioned context
    pub fn new_context(&self) -> ExecutionContext {
        ExecutionContext::new(Arc::clone(&self.launcher), self.profile.clone())
    }

    pub async fn before_scenario(&self, ctx: &mut ExecutionContext) -> HarnessResult<()> {
        self.artifacts.ensure_dir()?;
        ctx.provision().await
    }

    /// Capture a screenshot for failed scenarios, then release the context.
    ///
    /// Capture problems are logged and never stop the release. The returned
    /// error only reports an incomplete teardown.
    pub async fn after_scenario(&self, ctx: &mut ExecutionContext, record: &mut ScenarioRecord) -> HarnessResult<()> {
        if record.status.is_failed() && ctx.has_page() {
            self.capture_failure(ctx, record).await;
        }
        ctx.dispose().await
    }

    async fn capture_failure(&self, ctx: &ExecutionContext, record: &mut ScenarioRecord) {
        let png = match ctx.snapshot().await {
            Ok(png) => png,
            Err(e) => {
                warn!("Could not capture screenshot for {:?}: {}", record.name, e);
                return;
            }
        };

        record.attach(Attachment::png(png.clone()));
        info!("Attached failure screenshot to {:?} ({} bytes)", record.name, png.len());

        if let Err(e) = self.artifacts.persist(&record.name, Utc::now(), &png) {
            warn!("Could not save screenshot for {:?}: {}", record.name, e);
        }
    }
}
