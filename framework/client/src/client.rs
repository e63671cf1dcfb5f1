use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gale_instruments::OutcomeError;
use url::Url;

use crate::request::{form_fields, QueryRequest, TimestampUnit};

const QUERY_RANGE_PATH: &str = "select/0/prometheus/api/v1/query_range";

/// What one query attempt produced, before the scenario name is attached.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub started: DateTime<Utc>,
    pub status: u16,
    pub latency: Duration,
    pub error: Option<OutcomeError>,
}

/// The seam between the load engine and the wire.
///
/// The engine only ever talks to this trait, so tests drive scenarios against
/// stub services without a backend listening anywhere.
#[async_trait]
pub trait QueryService: Send + Sync + 'static {
    async fn send(&self, request: QueryRequest) -> QueryOutcome;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, e.g. `https://vmselect.example:8481`.
    pub base_url: Url,
    /// Per-request deadline. Exceeding it records a timeout outcome.
    pub timeout: Duration,
    pub timestamp_unit: TimestampUnit,
    /// Skip TLS certificate verification. Off unless asked for explicitly.
    pub insecure: bool,
    /// Bearer token attached to every request when set.
    pub auth_token: Option<String>,
}

/// reqwest-backed [QueryService] that POSTs form-encoded range queries.
pub struct QueryClient {
    http: reqwest::Client,
    endpoint: Url,
    timestamp_unit: TimestampUnit,
    auth_token: Option<String>,
}

impl QueryClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        if config.insecure {
            log::warn!("TLS certificate verification is disabled for this run");
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .context("Failed to build the HTTP client")?;

        Ok(Self {
            http,
            endpoint: query_range_endpoint(&config.base_url),
            timestamp_unit: config.timestamp_unit,
            auth_token: config.auth_token,
        })
    }

}

#[async_trait]
impl QueryService for QueryClient {
    async fn send(&self, request: QueryRequest) -> QueryOutcome {
        let started = Utc::now();
        let clock = Instant::now();

        let mut http_request = self
            .http
            .post(self.endpoint.clone())
            .form(&form_fields(&request, self.timestamp_unit));
        if let Some(token) = &self.auth_token {
            http_request = http_request.bearer_auth(token);
        }

        match http_request.send().await {
            Ok(response) => QueryOutcome {
                started,
                status: response.status().as_u16(),
                latency: clock.elapsed(),
                error: None,
            },
            Err(e) if e.is_timeout() => {
                log::debug!("Query timed out after {:?}: {e}", clock.elapsed());
                QueryOutcome {
                    started,
                    status: 0,
                    latency: clock.elapsed(),
                    error: Some(OutcomeError::Timeout),
                }
            }
            Err(e) => {
                log::debug!("Query failed at the transport level: {e}");
                QueryOutcome {
                    started,
                    status: 0,
                    latency: clock.elapsed(),
                    error: Some(OutcomeError::Transport),
                }
            }
        }
    }
}

fn query_range_endpoint(base_url: &Url) -> Url {
    let mut endpoint = base_url.clone();
    endpoint.set_path(&format!(
        "{}/{QUERY_RANGE_PATH}",
        base_url.path().trim_end_matches('/')
    ));
    endpoint
}
