use tabled::Tabled;

use crate::report::ScenarioReport;

#[derive(Tabled)]
pub(crate) struct ScenarioRow {
    pub scenario: String,
    pub status: String,
    pub requests: usize,
    #[tabled(rename = "success %")]
    pub success_pct: String,
    pub errors: usize,
    #[tabled(rename = "p50 (ms)")]
    pub p50_ms: String,
    #[tabled(rename = "p99 (ms)")]
    pub p99_ms: String,
    #[tabled(rename = "max (ms)")]
    pub max_ms: String,
}

impl From<&ScenarioReport> for ScenarioRow {
    fn from(report: &ScenarioReport) -> Self {
        let latency =
            |select: fn(&crate::report::LatencySummary) -> f64| match &report.latency {
                Some(summary) => format!("{:.2}", select(summary)),
                None => "-".to_string(),
            };

        Self {
            scenario: report.name.clone(),
            status: report.status.to_string(),
            requests: report.requests,
            success_pct: format!("{:.1}", report.success_rate * 100.0),
            errors: report.transport_errors + report.timeout_errors,
            p50_ms: latency(|l| l.p50_ms),
            p99_ms: latency(|l| l.p99_ms),
            max_ms: latency(|l| l.max_ms),
        }
    }
}
