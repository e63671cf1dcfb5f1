use tokio::sync::watch::{self, Receiver, Sender};

/// Owner side of the run-wide shutdown signal.
///
/// The signal is edge-triggered once and then latched. Workers are expected to
/// check their listener between work cycles and finish whatever they have in
/// flight before stopping, so firing the signal never aborts a request that
/// has already been issued.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<bool>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: watch::channel(false).0,
        }
    }

    /// Latch the shutdown signal. All current and future listeners observe it.
    pub fn shutdown(&self) {
        if self.sender.send(true).is_err() {
            // Nobody is listening, which can happen if all workers have
            // already finished. Nothing to do.
            log::debug!("Shutdown signalled with no remaining listeners");
        }
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener::new(self.sender.subscribe())
    }
}

/// Listener side of the shutdown signal, handed to each worker.
#[derive(Debug, Clone)]
pub struct DelegatedShutdownListener {
    receiver: Receiver<bool>,
}

impl DelegatedShutdownListener {
    pub(crate) fn new(receiver: Receiver<bool>) -> Self {
        Self { receiver }
    }

    /// Point in time check whether the shutdown signal has been latched.
    pub fn should_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait until the shutdown signal is latched. Safe to race against other
    /// futures to cancel pending work that has not been started yet.
    pub async fn wait_for_shutdown(&mut self) {
        while !*self.receiver.borrow_and_update() {
            if self.receiver.changed().await.is_err() {
                // The handle was dropped, treat that as a shutdown.
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_observes_latched_signal() {
        let handle = ShutdownHandle::new();
        let listener = handle.new_listener();

        assert!(!listener.should_shutdown());

        handle.shutdown();

        assert!(listener.should_shutdown());
        // Listeners created after the fact still see the signal.
        assert!(handle.new_listener().should_shutdown());
    }

    #[tokio::test]
    async fn wait_for_shutdown_completes_when_signalled() {
        let handle = ShutdownHandle::new();
        let mut listener = handle.new_listener();

        let waiter = tokio::spawn(async move {
            listener.wait_for_shutdown().await;
        });

        handle.shutdown();
        waiter.await.expect("shutdown waiter panicked");
    }
}
