use gale_core::prelude::ShutdownHandle;
use tokio::signal;

use crate::executor::Executor;

pub(crate) fn start_shutdown_listener(executor: &Executor) -> ShutdownHandle {
    let handle = ShutdownHandle::default();

    let listener_handle = handle.clone();
    executor.spawn(async move {
        signal::ctrl_c()
            .await
            .expect("Failed to receive Ctrl-C signal");
        log::info!("Received shutdown signal, finishing in-flight requests...");
        listener_handle.shutdown();
    });

    handle
}
