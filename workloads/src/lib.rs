use std::fmt;

use chrono::{DateTime, Utc};
use gale_client::QueryRequest;
use rand::RngCore;

mod builtin;
mod registry;

pub use builtin::{builtin_registry, gauge_rate, instant_metric, request_duration_sum};
pub use registry::{DuplicateWorkloadError, UnknownWorkloadError, WorkloadRegistry};

/// Builds one query request from the current time and the worker's random
/// source. Pure apart from the draws it takes from `rng`.
pub type RequestBuilder = fn(DateTime<Utc>, &mut dyn RngCore) -> QueryRequest;

/// A named, immutable query-generating function.
///
/// Registered once at startup and looked up by name when a scenario starts.
#[derive(Clone)]
pub struct Workload {
    name: String,
    build: RequestBuilder,
}

impl Workload {
    pub fn new(name: impl Into<String>, build: RequestBuilder) -> Self {
        Self {
            name: name.into(),
            build,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build_request(&self, now: DateTime<Utc>, rng: &mut dyn RngCore) -> QueryRequest {
        (self.build)(now, rng)
    }
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload").field("name", &self.name).finish()
    }
}
