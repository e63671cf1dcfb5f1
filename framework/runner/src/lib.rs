mod cli;
mod definition;
mod executor;
mod monitor;
mod progress;
mod run;
mod scenario;
mod shutdown;
mod types;

pub mod prelude {
    pub use crate::cli::GaleScenarioCli;
    pub use crate::definition::{RunDefinitionBuilder, ScenarioConfig};
    pub use crate::executor::Executor;
    pub use crate::run::{run, PartialRunError};
    pub use crate::types::GaleResult;
    pub use gale_client::{QueryOutcome, QueryRequest, QueryService, TimestampUnit};
    pub use gale_instruments::{RunReport, ScenarioStatus};
}
