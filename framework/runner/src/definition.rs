use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use gale_client::{ClientConfig, QueryClient, QueryService};
use gale_workloads::WorkloadRegistry;
use url::Url;

use crate::cli::GaleScenarioCli;

/// One scenario of a run: a named workload driven at a fixed concurrency for
/// a fixed duration. Immutable once the run starts.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub name: String,
    /// Name of the workload in the run's registry.
    pub workload: String,
    /// Number of workers issuing requests back to back.
    pub concurrency: usize,
    pub duration: Duration,
}

/// The builder for a load run.
///
/// This must be used at the start of a scenario binary to describe the run:
/// which workloads exist, which scenarios drive them, and where the traffic
/// goes.
pub struct RunDefinitionBuilder {
    /// The name of the run, which should be unique within the test suite.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: GaleScenarioCli,
    registry: WorkloadRegistry,
    service: Option<Arc<dyn QueryService>>,
    scenarios: Vec<ScenarioConfig>,
}

pub(crate) struct RunDefinition {
    pub name: String,
    pub run_id: String,
    pub registry: WorkloadRegistry,
    pub service: Arc<dyn QueryService>,
    pub scenarios: Vec<ScenarioConfig>,
    pub no_progress: bool,
    pub report_json: Option<PathBuf>,
}

impl RunDefinitionBuilder {
    /// Initialise a new run definition from the run name and already-parsed
    /// command line arguments.
    pub fn new(name: &str, cli: GaleScenarioCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            registry: WorkloadRegistry::new(),
            service: None,
            scenarios: Vec::new(),
        }
    }

    /// Initialise a new run definition, parsing the command line and setting
    /// up logging. This is what scenario binaries should call from `main`.
    pub fn new_with_init(name: &str) -> Self {
        let cli = crate::cli::init();
        Self::new(name, cli)
    }

    /// Set the workload registry the run's scenarios resolve against.
    pub fn with_workloads(mut self, registry: WorkloadRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Add a scenario to the run. All scenarios execute concurrently.
    ///
    /// `concurrency` and `duration` are defaults and can be overridden for
    /// the whole run from the command line.
    pub fn add_scenario(
        mut self,
        name: &str,
        workload: &str,
        concurrency: usize,
        duration: Duration,
    ) -> Self {
        if self.scenarios.iter().any(|s| s.name == name) {
            panic!("Scenario [{}] is already defined", name);
        }

        self.scenarios.push(ScenarioConfig {
            name: name.to_string(),
            workload: workload.to_string(),
            concurrency,
            duration,
        });

        self
    }

    /// Replace the HTTP query client with another [QueryService].
    ///
    /// When not set, a [QueryClient] is built from the command line options.
    /// Tests use this to drive scenarios against stub services.
    pub fn use_service(mut self, service: Arc<dyn QueryService>) -> Self {
        self.service = Some(service);
        self
    }

    pub(crate) fn build(self) -> anyhow::Result<RunDefinition> {
        let service: Arc<dyn QueryService> = match self.service {
            Some(service) => service,
            None => Arc::new(build_client(&self.cli)?),
        };

        let scenarios = self
            .scenarios
            .into_iter()
            .map(|mut scenario| {
                if let Some(concurrency) = self.cli.concurrency {
                    scenario.concurrency = concurrency;
                }
                if let Some(duration) = self.cli.duration {
                    scenario.duration = Duration::from_secs(duration);
                }
                scenario
            })
            .collect();

        Ok(RunDefinition {
            name: self.name,
            run_id: self
                .cli
                .run_id
                .clone()
                .unwrap_or_else(|| nanoid::nanoid!()),
            registry: self.registry,
            service,
            scenarios,
            no_progress: self.cli.no_progress,
            report_json: self.cli.report_json,
        })
    }
}

fn build_client(cli: &GaleScenarioCli) -> anyhow::Result<QueryClient> {
    let target = cli
        .target
        .as_deref()
        .context("A target URL is required, pass one with --target")?;
    let base_url = Url::parse(target).with_context(|| format!("Invalid target URL [{target}]"))?;

    QueryClient::new(ClientConfig {
        base_url,
        timeout: Duration::from_secs(cli.timeout),
        timestamp_unit: cli.timestamp_unit,
        insecure: cli.insecure,
        auth_token: cli.auth_token.clone(),
    })
}
