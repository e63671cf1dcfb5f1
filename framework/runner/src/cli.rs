use std::path::PathBuf;

use clap::Parser;
use gale_client::TimestampUnit;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct GaleScenarioCli {
    /// Base URL of the query backend to load, e.g. `https://vmselect.example:8481`
    #[clap(short, long)]
    pub target: Option<String>,

    /// Override the number of concurrent workers of every scenario
    #[clap(long)]
    pub concurrency: Option<usize>,

    /// Override the duration of every scenario, in seconds
    #[clap(long)]
    pub duration: Option<u64>,

    /// Per-request timeout, in seconds
    #[clap(long, default_value = "10")]
    pub timeout: u64,

    /// Skip TLS certificate verification.
    ///
    /// Only for targets with self-signed certificates. Verification is never
    /// skipped unless this flag is passed.
    #[clap(long, default_value = "false")]
    pub insecure: bool,

    /// Bearer token attached to every query request
    #[clap(long)]
    pub auth_token: Option<String>,

    /// Unit used to encode start/end timestamps, `seconds` or `nanoseconds`
    #[clap(long, default_value = "seconds", value_parser = parse_timestamp_unit)]
    pub timestamp_unit: TimestampUnit,

    /// Do not show a progress bar on the CLI.
    ///
    /// Recommended for CI environments where the bar just adds noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,

    /// Identifier for this run. Generated when not set.
    #[clap(long)]
    pub run_id: Option<String>,

    /// Write the final run report as JSON to this path
    #[clap(long)]
    pub report_json: Option<PathBuf>,
}

fn parse_timestamp_unit(s: &str) -> anyhow::Result<TimestampUnit> {
    match s {
        "seconds" => Ok(TimestampUnit::Seconds),
        "nanoseconds" => Ok(TimestampUnit::Nanoseconds),
        other => Err(anyhow::anyhow!(
            "Unknown timestamp unit [{other}], expected `seconds` or `nanoseconds`"
        )),
    }
}

/// Initialise logging and parse the command line.
pub(crate) fn init() -> GaleScenarioCli {
    env_logger::init();

    GaleScenarioCli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_unit_parses_both_units() {
        assert_eq!(
            parse_timestamp_unit("seconds").unwrap(),
            TimestampUnit::Seconds
        );
        assert_eq!(
            parse_timestamp_unit("nanoseconds").unwrap(),
            TimestampUnit::Nanoseconds
        );
        assert!(parse_timestamp_unit("millis").is_err());
    }
}
