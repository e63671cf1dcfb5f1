use std::sync::Arc;

use anyhow::Context;
use gale_instruments::{ReportConfig, RunReport};

use crate::definition::RunDefinitionBuilder;
use crate::executor::Executor;
use crate::monitor::start_monitor;
use crate::progress::start_progress;
use crate::scenario::spawn_workers;
use crate::shutdown::start_shutdown_listener;

/// One or more scenarios failed to set up. The rest of the run completed and
/// its report, with the failed scenarios' sections marked incomplete, is
/// attached.
#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("{} scenario(s) failed to set up: {}", failed.len(), failed.join(", "))]
pub struct PartialRunError {
    pub failed: Vec<String>,
    pub report: RunReport,
}

/// Execute a load run to completion and produce its report.
///
/// All scenarios run concurrently. A scenario whose setup fails, for example
/// because it names a workload that is not registered, does not stop the
/// others; the run finishes and the error carries the full report with that
/// scenario marked incomplete.
pub fn run(definition: RunDefinitionBuilder) -> anyhow::Result<RunReport> {
    let definition = definition.build()?;

    log::info!("Running load scenario set: {}", definition.name);

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let executor = Arc::new(Executor::new(runtime));
    let shutdown_handle = start_shutdown_listener(&executor);
    let reporter = Arc::new(
        ReportConfig::default()
            .with_run_id(definition.run_id.clone())
            .enable_summary()
            .init(),
    );

    for scenario in &definition.scenarios {
        reporter.add_scenario(&scenario.name);
    }

    let planned_runtime = definition
        .scenarios
        .iter()
        .map(|s| s.duration)
        .max()
        .unwrap_or_default();
    if !definition.no_progress && !planned_runtime.is_zero() {
        start_progress(planned_runtime, shutdown_handle.new_listener());
    }

    // Workers about to spawn, start watching for generator saturation that
    // would make the latency numbers misleading.
    start_monitor(shutdown_handle.new_listener());

    let mut failed = Vec::new();
    let mut handles = Vec::new();
    for scenario in &definition.scenarios {
        match definition.registry.get(&scenario.workload) {
            Ok(workload) => {
                log::info!(
                    "Starting scenario {} with {} workers for {:?}",
                    scenario.name,
                    scenario.concurrency,
                    scenario.duration
                );
                handles.extend(spawn_workers(
                    scenario,
                    workload.clone(),
                    definition.service.clone(),
                    executor.clone(),
                    reporter.clone(),
                    &shutdown_handle,
                ));
            }
            Err(e) => {
                log::error!("Scenario {} failed to set up: {}", scenario.name, e);
                reporter.mark_incomplete(&scenario.name, &e.to_string());
                failed.push(scenario.name.clone());
            }
        }
    }

    for handle in handles {
        handle
            .join()
            .map_err(|e| anyhow::anyhow!("Error joining worker thread: {:?}", e))?;
    }

    // All workers are done, release the progress and monitor threads.
    shutdown_handle.shutdown();

    let report = reporter.finalize();

    if let Some(path) = &definition.report_json {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report).context("Failed to serialize run report")?;
        log::info!("Wrote run report to {}", path.display());
    }

    if failed.is_empty() {
        Ok(report)
    } else {
        Err(PartialRunError { failed, report }.into())
    }
}
