use std::time::Duration;

use chrono::{DateTime, Utc};
use gale_client::QueryRequest;
use gale_core::prelude::window_for;
use rand::RngCore;

use crate::{RequestBuilder, Workload, WorkloadRegistry};

/// Every built-in workload queries the last 15 minutes with 10% jitter on
/// both window endpoints and a 60 second resolution step.
const LOOKBACK: Duration = Duration::from_secs(15 * 60);
const JITTER_FRACTION: f64 = 0.10;
const STEP: Duration = Duration::from_secs(60);

fn range_query(query: &str, now: DateTime<Utc>, rng: &mut dyn RngCore) -> QueryRequest {
    let (start, end) = window_for(now, LOOKBACK, JITTER_FRACTION, rng);

    QueryRequest {
        query: query.to_string(),
        start,
        end,
        step: STEP,
    }
}

/// Instant vector selector over a single series.
pub fn instant_metric(now: DateTime<Utc>, rng: &mut dyn RngCore) -> QueryRequest {
    range_query("up", now, rng)
}

/// Aggregation over histogram buckets.
pub fn request_duration_sum(now: DateTime<Utc>, rng: &mut dyn RngCore) -> QueryRequest {
    range_query(
        "sum by(le) (increase(vm_request_duration_seconds[1m]))",
        now,
        rng,
    )
}

/// Rate over a synthetic gauge.
pub fn gauge_rate(now: DateTime<Utc>, rng: &mut dyn RngCore) -> QueryRequest {
    range_query("rate(avalanche_gauge_metric_mmmmm_0_0[5m])", now, rng)
}

/// Registry with the three standard workloads: `metric`, `sum` and `rate`.
pub fn builtin_registry() -> WorkloadRegistry {
    let mut registry = WorkloadRegistry::new();

    let builtins: [(&str, RequestBuilder); 3] = [
        ("metric", instant_metric),
        ("sum", request_duration_sum),
        ("rate", gauge_rate),
    ];
    for (name, build) in builtins {
        registry
            .register(Workload::new(name, build))
            .expect("built-in workload names are unique");
    }

    registry
}
