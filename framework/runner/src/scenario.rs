use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use chrono::Utc;
use gale_client::QueryService;
use gale_core::prelude::ShutdownHandle;
use gale_instruments::{Reporter, RequestOutcome};
use gale_workloads::Workload;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::definition::ScenarioConfig;
use crate::executor::Executor;

/// Spawn the workers for one scenario.
///
/// Each worker loops until the scenario deadline: build a request from the
/// workload and the current time, send it, record the outcome. Workers do not
/// pace each other, a worker issues its next request as soon as the previous
/// one completes. A worker that is mid-request when the deadline passes
/// finishes that request before it observes the deadline and stops.
///
/// Request-level failures are recorded like any other outcome and never stop
/// a worker.
pub(crate) fn spawn_workers(
    config: &ScenarioConfig,
    workload: Workload,
    service: Arc<dyn QueryService>,
    executor: Arc<Executor>,
    reporter: Arc<Reporter>,
    shutdown_handle: &ShutdownHandle,
) -> Vec<JoinHandle<()>> {
    let started = Instant::now();

    (0..config.concurrency)
        .map(|worker_index| {
            let scenario_name = config.name.clone();
            let duration = config.duration;
            let workload = workload.clone();
            let service = service.clone();
            let executor = executor.clone();
            let reporter = reporter.clone();
            let shutdown_listener = shutdown_handle.new_listener();

            let worker_id = format!("{}-worker-{}", config.name, worker_index);

            std::thread::Builder::new()
                .name(worker_id.clone())
                .spawn(move || {
                    let mut rng = StdRng::from_entropy();

                    loop {
                        if started.elapsed() >= duration {
                            log::debug!("Deadline reached, stopping worker {}", worker_id);
                            break;
                        }
                        if shutdown_listener.should_shutdown() {
                            log::debug!("Stopping worker {}", worker_id);
                            break;
                        }

                        let request = workload.build_request(Utc::now(), &mut rng);
                        let outcome = executor.execute_in_place(service.send(request));

                        reporter.add_outcome(RequestOutcome {
                            scenario: scenario_name.clone(),
                            started: outcome.started,
                            status: outcome.status,
                            latency: outcome.latency,
                            error: outcome.error,
                        });
                    }
                })
                .expect("Failed to spawn worker thread")
        })
        .collect()
}
