/// Recommended error type for a scenario binary's `main` function. Compatible
/// with everything the runner returns so `?` propagates cleanly.
pub type GaleResult<T> = anyhow::Result<T>;
