use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

mod report;

pub use report::{
    LatencySummary, ReportConfig, Reporter, RunReport, ScenarioReport, ScenarioStatus,
};

/// Why a query attempt produced no usable response.
///
/// Only request-level failures are represented here. A response with a non-2xx
/// status is not an error in this sense, its status code is recorded instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeError {
    /// The request never completed at the network level.
    Transport,
    /// The per-request deadline elapsed before a full response arrived.
    Timeout,
}

impl OutcomeError {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeError::Transport => "transport",
            OutcomeError::Timeout => "timeout",
        }
    }
}

/// The recorded result of one query attempt.
///
/// Appended once to the run's outcome log and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// Name of the scenario the issuing worker belongs to.
    pub scenario: String,
    /// Wall-clock time the request was sent.
    pub started: DateTime<Utc>,
    /// HTTP status code of the response, or 0 when no response arrived.
    pub status: u16,
    /// Time from send until the full response, or until the failure.
    pub latency: Duration,
    pub error: Option<OutcomeError>,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}
