use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;

/// Produce a randomized `(start, end)` query window around `now`.
///
/// The window nominally covers the `lookback` period ending at `now`, with
/// both endpoints independently perturbed by a uniform draw from
/// `±lookback * jitter_fraction`. Spreading the endpoints like this keeps a
/// fleet of workers from hammering identical, cacheable ranges.
///
/// `jitter_fraction` must be in `[0, 1)` and `lookback` must be non-zero.
/// When a draw lands `start` on or past `end` (possible once the fraction
/// reaches 0.5), `start` is resampled until the ordering holds. Swapping the
/// endpoints instead would skew both distributions, so only `start` is ever
/// redrawn.
pub fn window_for<R>(
    now: DateTime<Utc>,
    lookback: Duration,
    jitter_fraction: f64,
    rng: &mut R,
) -> (DateTime<Utc>, DateTime<Utc>)
where
    R: Rng + ?Sized,
{
    assert!(
        (0.0..1.0).contains(&jitter_fraction),
        "jitter fraction must be in [0, 1), got {jitter_fraction}"
    );
    assert!(!lookback.is_zero(), "lookback must be non-zero");

    let lookback_ns = lookback.as_nanos() as i64;
    let jitter_ns = (lookback_ns as f64 * jitter_fraction).round() as i64;

    let end = now + TimeDelta::nanoseconds(jitter(rng, jitter_ns));

    let start_nominal = now - TimeDelta::nanoseconds(lookback_ns);
    let mut start = start_nominal + TimeDelta::nanoseconds(jitter(rng, jitter_ns));
    while start >= end {
        start = start_nominal + TimeDelta::nanoseconds(jitter(rng, jitter_ns));
    }

    (start, end)
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, range_ns: i64) -> i64 {
    if range_ns == 0 {
        return 0;
    }

    rng.gen_range(-range_ns..=range_ns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const LOOKBACK: Duration = Duration::from_secs(15 * 60);

    #[test]
    fn start_always_precedes_end() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();

        // A fraction past 0.5 makes the two jitter ranges overlap, so draws
        // with start >= end are possible and have to be corrected.
        for _ in 0..10_000 {
            let (start, end) = window_for(now, LOOKBACK, 0.75, &mut rng);
            assert!(start < end, "window inverted: {start} >= {end}");
        }
    }

    #[test]
    fn endpoints_stay_within_jitter_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let now = Utc::now();
        let jitter = TimeDelta::seconds(90);
        let lookback = TimeDelta::from_std(LOOKBACK).unwrap();

        for _ in 0..1_000 {
            let (start, end) = window_for(now, LOOKBACK, 0.10, &mut rng);

            assert!(end >= now - jitter && end <= now + jitter);
            assert!(start >= now - lookback - jitter && start <= now - lookback + jitter);
        }
    }

    #[test]
    fn zero_jitter_returns_the_nominal_window() {
        let mut rng = StdRng::seed_from_u64(13);
        let now = Utc::now();

        let (start, end) = window_for(now, LOOKBACK, 0.0, &mut rng);

        assert_eq!(end, now);
        assert_eq!(start, now - TimeDelta::from_std(LOOKBACK).unwrap());
    }

    #[test]
    #[should_panic(expected = "jitter fraction")]
    fn rejects_jitter_fraction_of_one() {
        let mut rng = StdRng::seed_from_u64(17);
        window_for(Utc::now(), LOOKBACK, 1.0, &mut rng);
    }
}
