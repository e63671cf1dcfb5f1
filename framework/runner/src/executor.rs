use std::future::Future;

/// Shared handle to the run's async runtime.
///
/// Workers are plain threads; the only suspending operation they perform is
/// the query round-trip, which they run to completion here. Shutdown is
/// observed between cycles, never by cancelling a request that is already on
/// the wire, so an in-flight request always yields an outcome.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
}

impl Executor {
    pub(crate) fn new(runtime: tokio::runtime::Runtime) -> Self {
        Self { runtime }
    }

    /// Run async code in place, blocking until it completes.
    pub fn execute_in_place<T>(&self, fut: impl Future<Output = T>) -> T {
        self.runtime.block_on(fut)
    }

    /// Submit async code to be run in the background.
    ///
    /// The runner does not wait for the future to complete before shutting
    /// down.
    pub fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        self.runtime.spawn(fut);
    }
}
