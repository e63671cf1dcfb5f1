mod scenario_table;

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tabled::settings::Style;
use tabled::Table;

use crate::report::scenario_table::ScenarioRow;
use crate::{OutcomeError, RequestOutcome};

/// Configuration for the run reporter.
#[derive(Default)]
pub struct ReportConfig {
    run_id: Option<String>,
    enable_summary: bool,
}

impl ReportConfig {
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Print a summary table of all scenarios when the report is finalized.
    pub fn enable_summary(mut self) -> Self {
        self.enable_summary = true;
        self
    }

    pub fn init(self) -> Reporter {
        Reporter {
            run_id: self.run_id.unwrap_or_else(|| "adhoc".to_string()),
            started_at: Utc::now().timestamp(),
            summary: self.enable_summary,
            scenarios: Mutex::new(Vec::new()),
            incomplete: Mutex::new(Vec::new()),
            outcomes: Mutex::new(Vec::new()),
        }
    }
}

/// Collects request outcomes from all workers of a run.
///
/// The outcome log is append-only. Workers push outcomes concurrently and the
/// log is only read back when the run finishes and [Reporter::finalize] turns
/// it into a [RunReport].
pub struct Reporter {
    run_id: String,
    started_at: i64,
    summary: bool,
    scenarios: Mutex<Vec<String>>,
    incomplete: Mutex<Vec<(String, String)>>,
    outcomes: Mutex<Vec<RequestOutcome>>,
}

impl Reporter {
    /// Declare a scenario so that it shows up in the report even if it never
    /// records an outcome. Report sections keep declaration order.
    pub fn add_scenario(&self, name: &str) {
        let mut scenarios = self.scenarios.lock();
        if !scenarios.iter().any(|s| s == name) {
            scenarios.push(name.to_string());
        }
    }

    pub fn add_outcome(&self, outcome: RequestOutcome) {
        self.outcomes.lock().push(outcome);
    }

    /// Mark a scenario as incomplete because its setup failed.
    ///
    /// An incomplete scenario is reported as such rather than as a scenario
    /// with a catastrophic success rate. The two must never be conflated.
    pub fn mark_incomplete(&self, scenario: &str, reason: &str) {
        self.add_scenario(scenario);
        self.incomplete
            .lock()
            .push((scenario.to_string(), reason.to_string()));
    }

    /// Merge the outcome log into a [RunReport] and, if enabled, print the
    /// summary table.
    pub fn finalize(&self) -> RunReport {
        let mut outcomes = self.outcomes.lock().clone();
        log::debug!("Aggregating {} recorded outcomes", outcomes.len());
        outcomes.sort_by_key(|outcome| outcome.started);

        let mut scenarios = self.scenarios.lock().clone();
        // Outcomes for scenarios nobody declared still get a section.
        for outcome in &outcomes {
            if !scenarios.iter().any(|s| *s == outcome.scenario) {
                scenarios.push(outcome.scenario.clone());
            }
        }

        let incomplete = self.incomplete.lock().clone();

        let report = RunReport {
            run_id: self.run_id.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: self.started_at,
            scenarios: scenarios
                .iter()
                .map(|name| {
                    let reason = incomplete
                        .iter()
                        .find(|(scenario, _)| scenario == name)
                        .map(|(_, reason)| reason.clone());
                    summarise_scenario(name, reason, &outcomes)
                })
                .collect(),
        };

        if self.summary {
            self.print_summary(&report);
        }

        report
    }

    fn print_summary(&self, report: &RunReport) {
        println!("\nRun {} summary", report.run_id);

        let rows = report
            .scenarios
            .iter()
            .map(ScenarioRow::from)
            .collect::<Vec<_>>();

        let mut table = Table::new(rows);
        table.with(Style::modern());

        println!("{table}");
    }
}

fn summarise_scenario(
    name: &str,
    incomplete_reason: Option<String>,
    outcomes: &[RequestOutcome],
) -> ScenarioReport {
    let outcomes = outcomes
        .iter()
        .filter(|outcome| outcome.scenario == name)
        .collect::<Vec<_>>();

    let requests = outcomes.len();
    let successes = outcomes.iter().filter(|o| o.is_success()).count();
    let count_errors = |kind: OutcomeError| {
        outcomes
            .iter()
            .filter(|o| o.error == Some(kind))
            .count()
    };

    ScenarioReport {
        name: name.to_string(),
        status: match incomplete_reason {
            Some(reason) => ScenarioStatus::Incomplete { reason },
            None => ScenarioStatus::Complete,
        },
        requests,
        successes,
        success_rate: if requests == 0 {
            0.0
        } else {
            successes as f64 / requests as f64
        },
        transport_errors: count_errors(OutcomeError::Transport),
        timeout_errors: count_errors(OutcomeError::Timeout),
        latency: LatencySummary::from_outcomes(&outcomes),
    }
}

/// Aggregate view over all outcomes of a run. Recomputed on demand, never
/// persisted mid-run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub engine_version: String,
    /// Unix timestamp, in seconds, of when the reporter was created.
    pub started_at: i64,
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub status: ScenarioStatus,
    pub requests: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub transport_errors: usize,
    pub timeout_errors: usize,
    /// Not present when the scenario recorded no outcomes.
    pub latency: Option<LatencySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Complete,
    /// The scenario's setup failed and it recorded no meaningful traffic.
    Incomplete { reason: String },
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioStatus::Complete => write!(f, "complete"),
            ScenarioStatus::Incomplete { reason } => write!(f, "incomplete ({reason})"),
        }
    }
}

/// Latency distribution over every recorded outcome of a scenario, failures
/// included. Failed requests still took time to fail and that time is part of
/// what the run measured.
#[derive(Debug, Clone, Serialize)]
pub struct LatencySummary {
    pub min_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    fn from_outcomes(outcomes: &[&RequestOutcome]) -> Option<Self> {
        if outcomes.is_empty() {
            return None;
        }

        let mut latencies = outcomes.iter().map(|o| o.latency).collect::<Vec<_>>();
        latencies.sort_unstable();

        let total: Duration = latencies.iter().sum();

        Some(Self {
            min_ms: as_ms(latencies[0]),
            mean_ms: as_ms(total) / latencies.len() as f64,
            p50_ms: as_ms(percentile(&latencies, 50.0)),
            p90_ms: as_ms(percentile(&latencies, 90.0)),
            p99_ms: as_ms(percentile(&latencies, 99.0)),
            max_ms: as_ms(latencies[latencies.len() - 1]),
        })
    }
}

/// Nearest-rank percentile over an ascending-sorted slice.
fn percentile(sorted: &[Duration], pct: f64) -> Duration {
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn as_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
