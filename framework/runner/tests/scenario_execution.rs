use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use gale_instruments::OutcomeError;
use gale_runner::prelude::{
    run, GaleScenarioCli, PartialRunError, QueryOutcome, QueryRequest, QueryService,
    RunDefinitionBuilder, ScenarioStatus, TimestampUnit,
};
use gale_workloads::builtin_registry;

fn sample_cli_cfg() -> GaleScenarioCli {
    GaleScenarioCli {
        target: None,
        concurrency: None,
        duration: None,
        timeout: 10,
        insecure: false,
        auth_token: None,
        timestamp_unit: TimestampUnit::Seconds,
        no_progress: true,
        run_id: Some("test-run".to_string()),
        report_json: None,
    }
}

/// Responds 200 after a fixed delay.
struct FixedLatencyService {
    latency: Duration,
}

#[async_trait]
impl QueryService for FixedLatencyService {
    async fn send(&self, _request: QueryRequest) -> QueryOutcome {
        let started = Utc::now();
        tokio::time::sleep(self.latency).await;

        QueryOutcome {
            started,
            status: 200,
            latency: self.latency,
            error: None,
        }
    }
}

/// Fails every request at the transport level after a short delay.
struct BrokenTransportService;

#[async_trait]
impl QueryService for BrokenTransportService {
    async fn send(&self, _request: QueryRequest) -> QueryOutcome {
        let started = Utc::now();
        tokio::time::sleep(Duration::from_millis(1)).await;

        QueryOutcome {
            started,
            status: 0,
            latency: Duration::from_millis(1),
            error: Some(OutcomeError::Transport),
        }
    }
}

#[test]
fn zero_duration_scenario_issues_no_requests() {
    let definition = RunDefinitionBuilder::new("zero_duration", sample_cli_cfg())
        .with_workloads(builtin_registry())
        .use_service(Arc::new(FixedLatencyService {
            latency: Duration::from_millis(1),
        }))
        .add_scenario("idle", "metric", 5, Duration::ZERO);

    let report = run(definition).unwrap();
    let scenario = report.scenario("idle").expect("scenario missing");

    assert_eq!(scenario.requests, 0);
    assert_eq!(scenario.status, ScenarioStatus::Complete);
    assert!(scenario.latency.is_none());
}

#[test]
fn throughput_is_close_to_nominal() {
    let definition = RunDefinitionBuilder::new("throughput", sample_cli_cfg())
        .with_workloads(builtin_registry())
        .use_service(Arc::new(FixedLatencyService {
            latency: Duration::from_millis(10),
        }))
        .add_scenario("steady", "metric", 5, Duration::from_secs(1));

    let report = run(definition).unwrap();
    let scenario = report.scenario("steady").expect("scenario missing");

    // 5 workers issuing back to back at ~10ms each lands near 500 requests.
    // Wide bounds to absorb scheduling overhead.
    assert!(
        (250..=750).contains(&scenario.requests),
        "expected roughly 500 requests, got {}",
        scenario.requests
    );
    assert_eq!(scenario.successes, scenario.requests);
    assert_eq!(scenario.success_rate, 1.0);
}

#[test]
fn transport_failures_do_not_stop_workers() {
    let definition = RunDefinitionBuilder::new("broken_transport", sample_cli_cfg())
        .with_workloads(builtin_registry())
        .use_service(Arc::new(BrokenTransportService))
        .add_scenario("flaky", "metric", 2, Duration::from_millis(200));

    let report = run(definition).unwrap();
    let scenario = report.scenario("flaky").expect("scenario missing");

    // Workers kept iterating through failures for the whole duration.
    assert!(
        scenario.requests > 10,
        "workers appear to have stopped early, got {} requests",
        scenario.requests
    );
    assert_eq!(scenario.successes, 0);
    assert_eq!(scenario.transport_errors, scenario.requests);
    assert_eq!(scenario.timeout_errors, 0);
    // Every recorded outcome is a transport failure, but the scenario itself
    // completed.
    assert_eq!(scenario.status, ScenarioStatus::Complete);
}

#[test]
fn unknown_workload_marks_the_scenario_incomplete() {
    let definition = RunDefinitionBuilder::new("partial_run", sample_cli_cfg())
        .with_workloads(builtin_registry())
        .use_service(Arc::new(FixedLatencyService {
            latency: Duration::from_millis(5),
        }))
        .add_scenario("good", "metric", 2, Duration::from_millis(200))
        .add_scenario("bad", "does_not_exist", 2, Duration::from_millis(200));

    let err = run(definition).unwrap_err();
    let partial = err
        .downcast_ref::<PartialRunError>()
        .expect("expected a PartialRunError");

    assert_eq!(partial.failed, vec!["bad".to_string()]);

    // The healthy scenario still ran to completion.
    let good = partial.report.scenario("good").expect("scenario missing");
    assert_eq!(good.status, ScenarioStatus::Complete);
    assert!(good.requests > 0);

    let bad = partial.report.scenario("bad").expect("scenario missing");
    assert!(matches!(bad.status, ScenarioStatus::Incomplete { .. }));
    assert_eq!(bad.requests, 0);
}

#[test]
fn cli_overrides_apply_to_every_scenario() {
    let mut cli = sample_cli_cfg();
    cli.concurrency = Some(1);
    cli.duration = Some(0);

    let definition = RunDefinitionBuilder::new("overrides", cli)
        .with_workloads(builtin_registry())
        .use_service(Arc::new(FixedLatencyService {
            latency: Duration::from_millis(1),
        }))
        .add_scenario("overridden", "metric", 50, Duration::from_secs(30 * 60));

    // With the duration forced to zero the run returns immediately, which is
    // the observable effect of the override being applied.
    let report = run(definition).unwrap();
    assert_eq!(report.scenario("overridden").unwrap().requests, 0);
}
