//! Cucumber suite against the live storefront
//!
//! Run with: cargo test -p storefront-e2e --test bdd
//!
//! Prerequisites:
//!   npm install playwright && npx playwright install chromium
//!
//! Every harness setting is also a command line flag, e.g.
//!   cargo test -p storefront-e2e --test bdd -- --headless false --slow-mo 250 --log-json
//!
//! The suite is skipped (exit 0) when Node/Playwright is missing or the
//! storefront cannot be reached.

mod steps;
mod world;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cucumber::event::ScenarioFinished;
use cucumber::{cli, World as _, StatsWriter as _};
use storefront_driver::playwright::{PlaywrightConfig, PlaywrightLauncher};
use storefront_e2e::{api, logging, LifecycleHooks, ScenarioRecord, ScenarioStatus, Settings, SuiteReport};
use tracing::{error, info, warn};

use world::ShopWorld;

const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(10);

fn scenario_status(finished: &ScenarioFinished) -> ScenarioStatus {
    match finished {
        ScenarioFinished::StepPassed => ScenarioStatus::Passed,
        ScenarioFinished::StepSkipped => ScenarioStatus::Skipped,
        _ => ScenarioStatus::Failed,
    }
}

/// Why the live suite cannot run here, if it cannot
async fn preflight(settings: &Settings) -> Option<String> {
    let launcher = PlaywrightLauncher::new(PlaywrightConfig {
        node_modules: settings.node_modules.clone(),
        ..Default::default()
    });
    if let Err(e) = launcher.probe().await {
        return Some(e.to_string());
    }
    if !api::is_reachable(&settings.base_url, REACHABILITY_TIMEOUT).await {
        return Some(format!("{} is not reachable", settings.base_url));
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = cli::Opts::<_, _, _, Settings>::parsed();
    let settings = opts.custom.clone();
    logging::init_from(&settings);

    if let Some(reason) = preflight(&settings).await {
        eprintln!("Skipping storefront suite: {}", reason);
        return Ok(());
    }

    let hooks = Arc::new(LifecycleHooks::from_settings(&settings));
    let report = Arc::new(SuiteReport::new());
    let features = Path::new(env!("CARGO_MANIFEST_DIR")).join("features");

    info!("Running storefront suite against {}", settings.base_url);

    let before_hooks = Arc::clone(&hooks);
    let after_hooks = Arc::clone(&hooks);
    let after_report = Arc::clone(&report);

    let writer = ShopWorld::cucumber()
        .max_concurrent_scenarios(1)
        .before(move |_feature, _rule, scenario, world| {
            let hooks = Arc::clone(&before_hooks);
            Box::pin(async move {
                info!("Scenario: {}", scenario.name);
                world.started = Some(Instant::now());

                let mut ctx = hooks.new_context();
                if let Err(e) = hooks.before_scenario(&mut ctx).await {
                    if let Err(cleanup) = ctx.dispose().await {
                        warn!("{}", cleanup);
                    }
                    panic!("Could not provision browser: {}", e);
                }
                world.context = Some(ctx);
            })
        })
        .after(move |feature, _rule, scenario, finished, world| {
            let hooks = Arc::clone(&after_hooks);
            let report = Arc::clone(&after_report);
            Box::pin(async move {
                let mut record = ScenarioRecord::new(&feature.name, &scenario.name, scenario_status(finished));

                if let Some(world) = world {
                    if let Some(started) = world.started.take() {
                        record = record.with_duration(started.elapsed());
                    }
                    if let Some(mut ctx) = world.context.take() {
                        if let Err(e) = hooks.after_scenario(&mut ctx, &mut record).await {
                            warn!("{}: {}", scenario.name, e);
                        }
                    }
                }

                report.push(record);
            })
        })
        .with_cli(opts)
        .run(features)
        .await;

    report.write(&settings.report_path)?;

    if writer.execution_has_failed() || report.has_failures() {
        error!("Storefront suite failed");
        std::process::exit(1);
    }
    Ok(())
}
