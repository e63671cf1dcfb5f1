use std::time::Duration;

use chrono::{DateTime, Utc};

/// One range query, built fresh for every request a worker issues.
///
/// `start < end` is guaranteed by the window generator that produced the
/// endpoints.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub query: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
}

/// Unit used to encode `start`/`end` on the wire.
///
/// The query_range API takes Unix timestamps in seconds, but some generators
/// in the wild send nanoseconds. The unit is an explicit choice here so a run
/// can reproduce either behaviour deliberately instead of inheriting one by
/// accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    Seconds,
    Nanoseconds,
}

impl TimestampUnit {
    pub fn encode(&self, timestamp: DateTime<Utc>) -> String {
        match self {
            TimestampUnit::Seconds => timestamp.timestamp().to_string(),
            // Saturates for dates past 2262, far beyond any query window.
            TimestampUnit::Nanoseconds => timestamp
                .timestamp_nanos_opt()
                .unwrap_or(i64::MAX)
                .to_string(),
        }
    }
}

/// Form fields for the POST body, in the order the scenario sends them.
pub(crate) fn form_fields(
    request: &QueryRequest,
    unit: TimestampUnit,
) -> [(&'static str, String); 4] {
    [
        ("query", request.query.clone()),
        ("start", unit.encode(request.start)),
        ("end", unit.encode(request.end)),
        ("step", format!("{}s", request.step.as_secs())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn request() -> QueryRequest {
        QueryRequest {
            query: "up".to_string(),
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 0, 15, 0).unwrap(),
            step: Duration::from_secs(60),
        }
    }

    #[test]
    fn encodes_second_timestamps() {
        let fields = form_fields(&request(), TimestampUnit::Seconds);

        assert_eq!(
            fields,
            [
                ("query", "up".to_string()),
                ("start", "1704067200".to_string()),
                ("end", "1704068100".to_string()),
                ("step", "60s".to_string()),
            ]
        );
    }

    #[test]
    fn encodes_nanosecond_timestamps() {
        let fields = form_fields(&request(), TimestampUnit::Nanoseconds);

        assert_eq!(fields[1], ("start", "1704067200000000000".to_string()));
        assert_eq!(fields[2], ("end", "1704068100000000000".to_string()));
    }

    #[test]
    fn step_is_rendered_in_whole_seconds() {
        let mut request = request();
        request.step = Duration::from_secs(300);

        let fields = form_fields(&request, TimestampUnit::Seconds);
        assert_eq!(fields[3], ("step", "300s".to_string()));
    }
}
