use std::time::Duration;

use gale_runner::prelude::{run, GaleResult, RunDefinitionBuilder};
use gale_workloads::builtin_registry;

const WORKERS_PER_SCENARIO: usize = 50;
const RUN_FOR: Duration = Duration::from_secs(30 * 60);

fn main() -> GaleResult<()> {
    let definition = RunDefinitionBuilder::new_with_init(env!("CARGO_PKG_NAME"))
        .with_workloads(builtin_registry())
        .add_scenario("test_metric", "metric", WORKERS_PER_SCENARIO, RUN_FOR)
        .add_scenario("test_sum", "sum", WORKERS_PER_SCENARIO, RUN_FOR)
        .add_scenario("test_rate", "rate", WORKERS_PER_SCENARIO, RUN_FOR);

    run(definition)?;

    Ok(())
}
