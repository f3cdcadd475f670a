//! Storefront E2E harness
//!
//! Page-object harness for the SauceDemo storefront:
//! - A capability facade (`Ui`) with bounded waits over the browser driver
//! - One screen object per storefront view
//! - A per-scenario execution context owning browser, session and page
//! - Lifecycle hooks that provision the context, capture a screenshot when a
//!   scenario fails and always release the context
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 cucumber runner (tests/bdd)                 │
//! │    step bindings ──> ExecutionContext::screens()            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  LifecycleHooks                                             │
//! │    ├── before_scenario(ctx) -> provision()                  │
//! │    └── after_scenario(ctx, record)                          │
//! │          ├── failed? snapshot -> Attachment + ArtifactStore │
//! │          └── dispose(): page -> session -> browser          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Screens { login, inventory, cart, checkout_* }             │
//! │    └── Ui (weak page handle, 10s action wait)               │
//! │          └── storefront_driver::Page                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod artifacts;
pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod report;
pub mod screens;
pub mod ui;

pub use artifacts::ArtifactStore;
pub use config::{BrowserProfile, Settings};
pub use context::ExecutionContext;
pub use error::{HarnessError, HarnessResult};
pub use hooks::LifecycleHooks;
pub use report::{Attachment, ScenarioRecord, ScenarioStatus, SuiteReport};
pub use screens::Screens;
pub use ui::Ui;
